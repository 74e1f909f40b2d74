pub mod p_keygen;

pub use p_keygen::{PublicKey, SecretKey, KeyPair};
