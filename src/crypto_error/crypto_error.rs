// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// L'appelant (binaire de démonstration, couche de persistance) reçoit une
// Err(...) et peut répondre proprement sans crasher le thread.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Le message m est >= n (hors domaine plaintext Paillier)
    MessageOutOfRange,
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,
    /// La taille de clé demandée est trop petite (< MIN_KEY_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
    /// Conversion BigInt -> BigUint échouée (résultat négatif, invariant interne)
    NegativeConversion,

    // --- Erreurs de terminaison des boucles de tirage ---
    /// La recherche de nombre premier a épuisé son plafond de candidats
    PrimeGenerationTimeout { attempts: u64 },
    /// Le tirage du randomiseur r (gcd(r, n) = 1) a épuisé son plafond
    RandomizerTimeout { attempts: u32 },

    // --- Erreurs de stockage / parsing des clés ---
    /// Parsing décimal invalide dans un champ de clé JSON
    DecimalParseError,
    /// Champ décimal trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    DecimalFieldTooLong { actual: usize, maximum: usize },
    /// Les deux moitiés d'une paire de clés ne partagent pas le même n :
    /// fichier corrompu ou recollé
    KeyCoherenceError,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::MessageOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de clé {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::NegativeConversion =>
                write!(f, "Conversion interne BigInt -> BigUint : résultat négatif inattendu"),
            CryptoError::PrimeGenerationTimeout { attempts } =>
                write!(f, "Aucun nombre premier trouvé après {attempts} candidats"),
            CryptoError::RandomizerTimeout { attempts } =>
                write!(f, "Aucun randomiseur r premier avec n trouvé après {attempts} tirages"),
            CryptoError::DecimalParseError =>
                write!(f, "Parsing décimal invalide dans le fichier de clés"),
            CryptoError::DecimalFieldTooLong { actual, maximum } =>
                write!(f, "Champ décimal trop long : {actual} caractères (maximum autorisé : {maximum})"),
            CryptoError::KeyCoherenceError =>
                write!(f, "Fichier de clés incohérent : n public != n secret (corrompu ou falsifié)"),
        }
    }
}

impl std::error::Error for CryptoError {}
