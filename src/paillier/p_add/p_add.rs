use num_bigint::BigUint;
use crate::paillier::p_keygen::PublicKey;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Addition homomorphique Paillier : le produit des chiffrés mod n²
// déchiffre vers la somme des clairs mod n.
//
//   D(p_add(E(m1), E(m2))) = m1 + m2  mod n
//
// C'est la seule opération homomorphique du cryptosystème (additive
// uniquement, pas de multiplication de clairs).
// Retourne Err(CryptoError::CiphertextOutOfRange) si un opérande >= n².
// ---------------------------------------------------------------------------
pub fn p_add(c1: &BigUint, c2: &BigUint, pk: &PublicKey) -> Result<BigUint, CryptoError> {
    if c1 >= &pk.n_squared || c2 >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    Ok((c1 * c2) % &pk.n_squared)
}
