use num_bigint::BigUint;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::SecretKey;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Déchiffrement Paillier : m = L(c^lambda mod n², n) · mu  mod n
//
// Ne dépend que de la clé secrète (qui porte n et n²).
// Retourne Err(CryptoError::CiphertextOutOfRange) si c >= n².
//
// Limitation connue : Paillier n'a aucun contrôle d'intégrité. Un chiffré
// produit sous une autre clé, ou un entier arbitraire dans [0, n²),
// déchiffre vers un nombre sans signification, sans erreur détectable.
// L'authentification relève d'une couche MAC au-dessus de ce cœur.
// ---------------------------------------------------------------------------
pub fn p_decrypt(c: &BigUint, sk: &SecretKey) -> Result<BigUint, CryptoError> {
    if c >= &sk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    // c^lambda mod n²
    let c_lambda = c.modpow(&sk.lambda, &sk.n_squared);

    // L(c^lambda mod n², n)
    let l_c_lambda = l_function(&c_lambda, &sk.n);

    // m = L(c^lambda mod n²) · mu  mod n
    let m = (&l_c_lambda * &sk.mu) % &sk.n;

    Ok(m)
}

// ===========================================================================
// Tests unitaires
// ===========================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};
    use crate::paillier::p_keygen::p_keygen::p_keygen;
    use crate::paillier::p_encrypt::p_encrypt;

    #[test]
    fn test_roundtrip_concrete_scenario() {
        // bits = 128 : chiffrer 42 puis déchiffrer doit rendre 42
        let kp = p_keygen(128).unwrap();
        let m = BigUint::from(42u32);
        let c = p_encrypt(&m, &kp.public_key).unwrap();
        assert_eq!(p_decrypt(&c, &kp.secret_key).unwrap(), m);
    }

    #[test]
    fn test_roundtrip_boundary_plaintexts() {
        let kp = p_keygen(64).unwrap();
        let n_minus_1 = &kp.public_key.n - BigUint::one();

        for m in [BigUint::zero(), BigUint::one(), n_minus_1] {
            let c = p_encrypt(&m, &kp.public_key).unwrap();
            assert_eq!(p_decrypt(&c, &kp.secret_key).unwrap(), m);
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        // Deux chiffrements de 42 diffèrent, mais déchiffrent tous deux vers 42
        let kp = p_keygen(64).unwrap();
        let m = BigUint::from(42u32);

        let c1 = p_encrypt(&m, &kp.public_key).unwrap();
        let c2 = p_encrypt(&m, &kp.public_key).unwrap();

        assert_ne!(c1, c2);
        assert_eq!(p_decrypt(&c1, &kp.secret_key).unwrap(), m);
        assert_eq!(p_decrypt(&c2, &kp.secret_key).unwrap(), m);
    }

    #[test]
    fn test_decrypt_rejects_ciphertext_out_of_range() {
        let kp = p_keygen(64).unwrap();
        let sk = &kp.secret_key;
        assert_eq!(
            p_decrypt(&sk.n_squared.clone(), sk),
            Err(CryptoError::CiphertextOutOfRange)
        );
    }
}
