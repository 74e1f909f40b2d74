use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::OsRng;
use crate::paillier::p_keygen::PublicKey;
use crate::paillier::math::gcd;
use crate::crypto_error::CryptoError;

// Plafond du tirage par rejet de r. Les seuls diviseurs de n sont deux
// grands premiers : un tirage suffit en pratique, le plafond borne le
// pire cas d'une source aléatoire dégénérée.
const MAX_RANDOMIZER_DRAWS: u32 = 64;

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m * r^n  mod n²
//
// Retourne Err(CryptoError::MessageOutOfRange) si m >= n.
//
// r est tiré dans Z*_n depuis OsRng (entropie système) : chaque appel
// consomme sa propre source, aucun état aléatoire partagé entre threads.
// Deux chiffrements du même m produisent des chiffrés distincts avec une
// probabilité écrasante.
// ---------------------------------------------------------------------------
pub fn p_encrypt(m: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    // Validation de l'entrée : erreur récupérable, pas de panic
    if m >= &pk.n {
        return Err(CryptoError::MessageOutOfRange);
    }

    let mut rng = OsRng;

    // Choisit r dans [1, n) avec gcd(r, n) = 1 (conformité formelle Paillier)
    let mut r = None;
    for _ in 0..MAX_RANDOMIZER_DRAWS {
        let candidate = rng.gen_biguint_range(&One::one(), &pk.n);
        if gcd(&candidate, &pk.n) == BigUint::one() {
            r = Some(candidate);
            break;
        }
    }
    let r = r.ok_or(CryptoError::RandomizerTimeout {
        attempts: MAX_RANDOMIZER_DRAWS,
    })?;

    // c = g^m * r^n  mod n²
    let g_m = pk.g.modpow(m, &pk.n_squared);
    let r_n = r.modpow(&pk.n, &pk.n_squared);
    let c = (&g_m * &r_n) % &pk.n_squared;

    Ok(c)
}

// ===========================================================================
// Tests unitaires
// ===========================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::paillier::p_keygen::p_keygen::p_keygen;

    #[test]
    fn test_encrypt_rejects_message_equal_to_n() {
        let kp = p_keygen(64).unwrap();
        let pk = &kp.public_key;
        assert_eq!(p_encrypt(&pk.n, pk), Err(CryptoError::MessageOutOfRange));
    }

    #[test]
    fn test_encrypt_rejects_message_above_n() {
        let kp = p_keygen(64).unwrap();
        let pk = &kp.public_key;
        let m = &pk.n + BigUint::one();
        assert_eq!(p_encrypt(&m, pk), Err(CryptoError::MessageOutOfRange));
    }

    #[test]
    fn test_ciphertext_in_range() {
        let kp = p_keygen(64).unwrap();
        let pk = &kp.public_key;
        let c = p_encrypt(&BigUint::from(42u32), pk).unwrap();
        assert!(c < pk.n_squared);
    }
}
