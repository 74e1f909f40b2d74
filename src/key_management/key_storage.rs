use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::io;
use num_bigint::BigUint;
use num_traits::Num;
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};
use crate::crypto_error::CryptoError;

// ============================================================================
// Protection DoS parsing : limites de taille des entrées
//
// Sans ces limites, un attaquant qui contrôle un fichier de clés JSON peut :
//   - Soumettre un fichier de plusieurs Go : lecture en mémoire non bornée,
//     le processus est tué par l'OOM killer.
//   - Soumettre un champ décimal de plusieurs Mo : la conversion
//     chaîne -> BigUint est superlinéaire en taille d'entrée, le CPU est
//     saturé pendant plusieurs secondes par requête.
//
// Ces constantes sont vérifiées AVANT toute opération coûteuse.
// Dimensionnées pour des clés Paillier jusqu'à 4096 bits :
//   n et lambda font au plus 8192 bits ≈ 2466 chiffres décimaux.
//   On prend 4096 avec une marge confortable.
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (32 Ko)
const MAX_KEY_FILE_BYTES: u64 = 32_768;

/// Longueur maximale d'un champ décimal en caractères.
const MAX_DEC_FIELD_LEN: usize = 4_096;

// ============================================================================
// Structures JSON pour la sérialisation des clés
//
// Contrat externe : la clé publique s'échange comme la paire (n, g), la clé
// secrète comme le triplet (lambda, mu, n). Tous les champs sont des chaînes
// décimales, le format que toute couche de persistance ou d'affichage
// (fichier, base, vue tabulaire) stocke et rend sans perte.
// n_squared n'est jamais écrit : il est recalculé au chargement.
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicKeyJson {
    pub n: String,
    pub g: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SecretKeyJson {
    pub lambda: String,
    pub mu:     String,
    pub n:      String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KeyPairJson {
    pub public_key: PublicKeyJson,
    pub secret_key: SecretKeyJson,
}

// ============================================================================
// Conversion BigUint ↔ décimal
// ============================================================================

pub fn biguint_to_dec(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Convertit une chaîne décimale en BigUint.
///
/// Vérifie la longueur du champ AVANT la conversion pour éviter une
/// allocation BigUint géante (vecteur DoS CPU).
///
/// Retourne :
///   Err(DecimalFieldTooLong)  si len > MAX_DEC_FIELD_LEN
///   Err(DecimalParseError)    si le contenu n'est pas un décimal valide
pub fn dec_to_biguint(dec_str: &str) -> Result<BigUint, CryptoError> {
    if dec_str.len() > MAX_DEC_FIELD_LEN {
        return Err(CryptoError::DecimalFieldTooLong {
            actual:  dec_str.len(),
            maximum: MAX_DEC_FIELD_LEN,
        });
    }
    BigUint::from_str_radix(dec_str, 10)
        .map_err(|_| CryptoError::DecimalParseError)
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson {
        n: biguint_to_dec(&pk.n),
        g: biguint_to_dec(&pk.g),
    }
}

pub fn secret_key_to_json(sk: &SecretKey) -> SecretKeyJson {
    SecretKeyJson {
        lambda: biguint_to_dec(&sk.lambda),
        mu:     biguint_to_dec(&sk.mu),
        n:      biguint_to_dec(&sk.n),
    }
}

pub fn keypair_to_json(kp: &KeyPair) -> KeyPairJson {
    KeyPairJson {
        public_key: public_key_to_json(&kp.public_key),
        secret_key: secret_key_to_json(&kp.secret_key),
    }
}

// ============================================================================
// Conversion JSON → structures Rust
// n_squared est recalculé, jamais lu depuis le fichier.
// Validation de cohérence : les deux moitiés d'une paire partagent le même n.
// ============================================================================

pub fn json_to_public_key(json: &PublicKeyJson) -> Result<PublicKey, CryptoError> {
    let n = dec_to_biguint(&json.n)?;
    let g = dec_to_biguint(&json.g)?;
    let n_squared = &n * &n;

    Ok(PublicKey { n, g, n_squared })
}

pub fn json_to_secret_key(json: &SecretKeyJson) -> Result<SecretKey, CryptoError> {
    let lambda = dec_to_biguint(&json.lambda)?;
    let mu     = dec_to_biguint(&json.mu)?;
    let n      = dec_to_biguint(&json.n)?;
    let n_squared = &n * &n;

    Ok(SecretKey { lambda, mu, n, n_squared })
}

pub fn json_to_keypair(json: &KeyPairJson) -> Result<KeyPair, CryptoError> {
    let public_key = json_to_public_key(&json.public_key)?;
    let secret_key = json_to_secret_key(&json.secret_key)?;

    // Cohérence structurelle : un fichier recollé à partir de deux paires
    // différentes ne doit pas passer
    if public_key.n != secret_key.n {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(KeyPair { public_key, secret_key })
}

// ============================================================================
// Vérification de taille de fichier (protection DoS)
//
// Appelée avant fs::read_to_string. La métadonnée est lue sans ouvrir
// le contenu.
// ============================================================================

fn check_file_size(filepath: &str) -> io::Result<()> {
    let meta = fs::metadata(filepath)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets). \
                 Possible tentative DoS.",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// Sauvegarde JSON sur disque
// ============================================================================

pub fn save_keypair_json(kp: &KeyPair, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&keypair_to_json(kp))?;
    fs::write(filepath, json)?;
    Ok(())
}

pub fn save_public_key_json(pk: &PublicKey, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&public_key_to_json(pk))?;
    fs::write(filepath, json)?;
    Ok(())
}

pub fn save_secret_key_json(sk: &SecretKey, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&secret_key_to_json(sk))?;
    fs::write(filepath, json)?;
    Ok(())
}

// ============================================================================
// Chargement JSON depuis disque
// Vérification de la taille du fichier AVANT la lecture (protection DoS).
// ============================================================================

pub fn load_keypair_json(filepath: &str) -> io::Result<KeyPair> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: KeyPairJson = serde_json::from_str(&raw)?;
    json_to_keypair(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub fn load_public_key_json(filepath: &str) -> io::Result<PublicKey> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: PublicKeyJson = serde_json::from_str(&raw)?;
    json_to_public_key(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub fn load_secret_key_json(filepath: &str) -> io::Result<SecretKey> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: SecretKeyJson = serde_json::from_str(&raw)?;
    json_to_secret_key(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(filepath: &str) -> bool {
    Path::new(filepath).exists()
}

pub fn ensure_keys_directory(dir_path: &str) -> io::Result<()> {
    if !Path::new(dir_path).exists() {
        fs::create_dir_all(dir_path)?;
    }
    Ok(())
}

// ===========================================================================
// Tests unitaires
// ===========================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};
    use crate::paillier::p_keygen::p_keygen::p_keygen;

    #[test]
    fn test_decimal_roundtrip() {
        for v in [
            BigUint::zero(),
            BigUint::one(),
            BigUint::from(42u32),
            BigUint::from(u64::MAX),
        ] {
            assert_eq!(dec_to_biguint(&biguint_to_dec(&v)).unwrap(), v);
        }
    }

    #[test]
    fn test_dec_field_too_long_rejected_before_parse() {
        let huge = "1".repeat(MAX_DEC_FIELD_LEN + 1);
        assert!(matches!(
            dec_to_biguint(&huge),
            Err(CryptoError::DecimalFieldTooLong { .. })
        ));
    }

    #[test]
    fn test_dec_parse_error() {
        assert_eq!(dec_to_biguint("12a4"), Err(CryptoError::DecimalParseError));
        assert_eq!(dec_to_biguint(""), Err(CryptoError::DecimalParseError));
    }

    #[test]
    fn test_keypair_json_roundtrip() {
        let kp = p_keygen(64).unwrap();
        let restored = json_to_keypair(&keypair_to_json(&kp)).unwrap();

        assert_eq!(restored.public_key.n, kp.public_key.n);
        assert_eq!(restored.public_key.g, kp.public_key.g);
        assert_eq!(restored.public_key.n_squared, kp.public_key.n_squared);
        assert_eq!(restored.secret_key.lambda, kp.secret_key.lambda);
        assert_eq!(restored.secret_key.mu, kp.secret_key.mu);
        assert_eq!(restored.secret_key.n, kp.secret_key.n);
    }

    #[test]
    fn test_keypair_spliced_from_two_pairs_rejected() {
        let kp1 = p_keygen(64).unwrap();
        let kp2 = p_keygen(64).unwrap();

        let spliced = KeyPairJson {
            public_key: public_key_to_json(&kp1.public_key),
            secret_key: secret_key_to_json(&kp2.secret_key),
        };
        assert!(matches!(
            json_to_keypair(&spliced),
            Err(CryptoError::KeyCoherenceError)
        ));
    }

    #[test]
    fn test_json_serde_text_roundtrip() {
        // Le JSON produit doit repasser par serde_json sans perte
        let kp = p_keygen(64).unwrap();
        let text = serde_json::to_string_pretty(&keypair_to_json(&kp)).unwrap();
        let parsed: KeyPairJson = serde_json::from_str(&text).unwrap();
        let restored = json_to_keypair(&parsed).unwrap();
        assert_eq!(restored.public_key.n, kp.public_key.n);
        assert_eq!(restored.secret_key.mu, kp.secret_key.mu);
    }
}
