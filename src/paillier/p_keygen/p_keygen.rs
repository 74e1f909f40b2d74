use num_bigint::BigUint;
use num_traits::One;
use zeroize::Zeroize;
use crate::paillier::math::{l_function, gcd, lcm, mod_inverse, generate_prime};
use crate::crypto_error::CryptoError;

// ============================================================================
// Clé publique Paillier : pas de données secrètes, pas de zeroize nécessaire
//
// n_squared est mis en cache car chaque chiffrement et chaque addition
// homomorphique réduit mod n².
// ============================================================================
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub n:         BigUint,
    pub g:         BigUint,
    pub n_squared: BigUint,
}

// ============================================================================
// Helper : efface les octets internes d'un BigUint
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let bits = n.bits() as usize;
    if bits > 0 {
        *n = BigUint::from_bytes_be(&vec![0u8; (bits + 7) / 8]);
    }
    *n = BigUint::default();
}

// ============================================================================
// Clé secrète Paillier : ZEROISÉE À LA DESTRUCTION
//
// Porte n et n² pour que le déchiffrement ne dépende que d'elle.
// Seuls lambda et mu sont secrets ; n est public par définition.
// ============================================================================
#[derive(Clone, Debug)]
pub struct SecretKey {
    pub lambda:    BigUint,
    pub mu:        BigUint,
    pub n:         BigUint,
    pub n_squared: BigUint,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.lambda);
        zeroize_biguint(&mut self.mu);
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés
//
// Générée une fois par session puis immuable : partagée par référence
// entre tous les appels de chiffrement/déchiffrement, jamais mutée.
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

// ============================================================================
// Génération de clés Paillier
//
// 1. p et q : deux premiers indépendants de nbits bits chacun (q est
//    retiré tant que p == q, collision astronomiquement improbable mais
//    structurellement exclue ici).
// 2. n = p·q, n² et g = n + 1.
// 3. lambda = lcm(p-1, q-1) = (p-1)(q-1) / gcd(p-1, q-1).
// 4. mu = L(g^lambda mod n², n)^-1 mod n.
//
// g = n+1 permet de calculer g^lambda mod n² sans modpow, par l'identité
// du binôme : (n+1)^lambda ≡ 1 + lambda·n (mod n²). Une multiplication
// et un modulo au lieu d'une exponentiation sur des opérandes de 2n bits.
// ============================================================================
pub fn p_keygen(nbits: u64) -> Result<KeyPair, CryptoError> {
    let p = generate_prime(nbits)?;
    let mut q = generate_prime(nbits)?;
    while p == q {
        q = generate_prime(nbits)?;
    }

    let n         = &p * &q;
    let n_squared = &n * &n;

    let p_minus_1 = &p - BigUint::one();
    let q_minus_1 = &q - BigUint::one();

    let lambda = lcm(&p_minus_1, &q_minus_1);

    let g = &n + BigUint::one();

    // (n+1)^lambda mod n² = (1 + lambda·n) mod n²
    let g_lambda = (BigUint::one() + &lambda * &n) % &n_squared;

    let l_g_lambda = l_function(&g_lambda, &n);

    // Invariant : gcd(L(g^lambda mod n²), n) = 1 pour deux grands premiers
    // distincts de même taille.
    if gcd(&l_g_lambda, &n) != BigUint::one() {
        return Err(CryptoError::NoModularInverse);
    }

    let mu = mod_inverse(&l_g_lambda, &n)?;

    Ok(KeyPair {
        public_key: PublicKey {
            n: n.clone(),
            g,
            n_squared: n_squared.clone(),
        },
        secret_key: SecretKey { lambda, mu, n, n_squared },
    })
}

// ===========================================================================
// Tests unitaires
// ===========================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen_rejects_small_sizes() {
        assert!(matches!(
            p_keygen(8),
            Err(CryptoError::KeySizeTooSmall { requested: 8, .. })
        ));
    }

    #[test]
    fn test_keygen_structure() {
        let kp = p_keygen(128).unwrap();
        let pk = &kp.public_key;
        let sk = &kp.secret_key;

        // n = p·q avec p, q de 128 bits exactement
        assert!(pk.n.bits() == 256 || pk.n.bits() == 255);
        assert_eq!(pk.g, &pk.n + BigUint::one());
        assert_eq!(pk.n_squared, &pk.n * &pk.n);

        // Les deux moitiés partagent le même module
        assert_eq!(pk.n, sk.n);
        assert_eq!(pk.n_squared, sk.n_squared);
    }

    #[test]
    fn test_keygen_mu_inverts_lambda_mod_n() {
        let kp = p_keygen(64).unwrap();
        let sk = &kp.secret_key;

        // L(g^lambda mod n²) = lambda mod n, donc mu · (lambda mod n) ≡ 1 (mod n)
        let lambda_mod_n = &sk.lambda % &sk.n;
        assert_eq!((&lambda_mod_n * &sk.mu) % &sk.n, BigUint::one());
    }
}
