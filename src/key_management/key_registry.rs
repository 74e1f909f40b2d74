// ============================================================================
// KeyRegistry : registre de clés thread-safe pour la durée d'une session
//
// Une paire de clés est générée une fois puis lue par un nombre arbitraire
// de threads (chiffrement en parallèle, déchiffrement à la demande). Le
// registre matérialise ce cycle de vie :
//   - Arc<T>    : comptage de références atomique, cloneable entre threads
//   - RwLock<T> : plusieurs lecteurs simultanés, un seul écrivain exclusif
//   - Option<T> : distingue "clé non encore chargée" de "clé chargée"
//
// Pattern d'usage :
//   1. Au démarrage : KeyRegistry::new() puis registry.set_keypair(kp)?
//   2. Dans chaque thread : let pk = registry.public_key()?  (lecture partagée)
//   3. Rotation de clé : registry.set_keypair(new_kp)?  (écriture exclusive)
//
// RwLock plutôt que Mutex : la quasi-totalité des accès sont des lectures
// de la clé publique, qui peuvent s'exécuter toutes en même temps.
// ============================================================================

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

// ============================================================================
// Erreurs spécifiques au registre
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Aucune paire de clés Paillier n'a encore été chargée dans le registre
    NoPaillierKey,
    /// Le verrou RwLock est empoisonné (thread paniqué pendant un accès exclusif)
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NoPaillierKey =>
                write!(f, "Aucune clé Paillier chargée dans le registre"),
            RegistryError::LockPoisoned =>
                write!(f, "Verrou du registre empoisonné : redémarrage requis"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ============================================================================
// État interne protégé par RwLock
// ============================================================================

struct RegistryState {
    keypair: Option<KeyPair>,
}

// ============================================================================
// KeyRegistry : point d'entrée unique pour l'accès aux clés d'une session
//
// Clonable à faible coût grâce à Arc (clone = incrément d'un compteur
// atomique). Peut être transmis aux handlers de chaque thread via .clone().
// ============================================================================
#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl KeyRegistry {
    // -----------------------------------------------------------------------
    // Constructeur : registre vide, prêt à recevoir des clés
    // -----------------------------------------------------------------------
    pub fn new() -> Self {
        KeyRegistry {
            inner: Arc::new(RwLock::new(RegistryState { keypair: None })),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    // -----------------------------------------------------------------------
    // Chargement / rotation de la paire de clés
    //
    // Écriture exclusive : bloque les lecteurs pendant le remplacement.
    // Durée typique : quelques microsecondes (déplacement de pointeurs).
    // -----------------------------------------------------------------------
    pub fn set_keypair(&self, kp: KeyPair) -> Result<(), RegistryError> {
        self.write()?.keypair = Some(kp);
        Ok(())
    }

    /// Supprime la paire de clés (et déclenche la zeroization via Drop)
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        self.write()?.keypair = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accès à la clé publique : lecture partagée (N threads simultanés)
    //
    // Retourne un clone de PublicKey. PublicKey ne contient pas de données
    // secrètes, le clonage est sans impact sécuritaire.
    // -----------------------------------------------------------------------
    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        let guard = self.read()?;
        guard.keypair
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Exécution d'une opération avec accès à la clé secrète
    //
    // Pattern "prêter sans cloner" : la clé secrète n'est jamais extraite
    // du registre. La closure reçoit une référence &SecretKey valide
    // uniquement pendant l'exécution, puis le verrou est relâché.
    //
    // Usage typique :
    //   let m = registry.with_secret_key(|sk| p_decrypt(&ct, sk))?;
    // -----------------------------------------------------------------------
    pub fn with_secret_key<F, T>(&self, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&SecretKey) -> T,
    {
        let guard = self.read()?;
        guard.keypair
            .as_ref()
            .map(|kp| f(&kp.secret_key))
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Vérification de présence des clés (utile au démarrage)
    // -----------------------------------------------------------------------
    pub fn has_keypair(&self) -> bool {
        self.read().ok()
            .and_then(|g| g.keypair.as_ref().map(|_| true))
            .unwrap_or(false)
    }
}

impl Default for KeyRegistry {
    fn default() -> Self { Self::new() }
}
