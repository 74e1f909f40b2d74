// =========================================================
// Démonstration & métriques : cryptosystème de Paillier
// Chiffrement à clé publique, homomorphique additif
// =========================================================

// ── Cœur Paillier ─────────────────────────────────────────
use paillier_core::p_keygen::p_keygen::p_keygen;
use paillier_core::p_encrypt::p_encrypt::p_encrypt;
use paillier_core::p_decrypt::p_decrypt::p_decrypt;
use paillier_core::p_add::p_add::p_add;

// ── Gestion des clés ──────────────────────────────────────
use paillier_core::key_management::{
    key_file_exists, ensure_keys_directory,
    save_keypair_json, save_public_key_json, save_secret_key_json,
    load_keypair_json,
};

// ── Types et erreurs ──────────────────────────────────────
use paillier_core::CryptoError;
use paillier_core::KeyPair;

// ── Stdlib & crates externes ──────────────────────────────
use num_bigint::RandBigInt;
use rand_core::OsRng;
use std::io::{self, Write};
use std::time::{Duration, Instant};

// ── Taille de clé et chemins des fichiers de clés ─────────
const KEY_BITS: u64 = 1024;

const KEYS_DIR:             &str = "keys";
const KEYPAIR_JSON_PATH:    &str = "keys/keypair.json";
const PUBLIC_KEY_JSON_PATH: &str = "keys/public_key.json";
const SECRET_KEY_JSON_PATH: &str = "keys/secret_key.json";

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ? sans conversion manuelle, plus aucun panic!
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    if let Err(e) = ensure_keys_directory(KEYS_DIR) {
        eprintln!("[FATAL] Impossible de créer le répertoire keys/ : {}", e);
        std::process::exit(1);
    }

    loop {
        afficher_menu();
        let choix = lire_choix();

        let res = match choix.as_str() {
            "1" => demonstration_paillier(),
            "2" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir 1 ou 2.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }

        println!("\nAppuyez sur Entrée pour continuer...");
        let mut pause = String::new();
        io::stdin().read_line(&mut pause).ok();
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   CRYPTOSYSTÈME DE PAILLIER — MENU            ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] Démonstration (chiffrement + addition homomorphique)");
    println!("  [2] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

fn lire_choix() -> String {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    input.trim().to_string()
}

// ─────────────────────────────────────────────────────────
// Gestion des clés : chargement ou génération + sauvegarde
// ─────────────────────────────────────────────────────────

/// Charge les clés depuis le disque si elles existent,
/// sinon les génère, les sauvegarde et retourne le chrono de génération.
fn charger_ou_generer_cles(bits: u64) -> Result<(KeyPair, Option<Duration>), AppError> {
    if key_file_exists(KEYPAIR_JSON_PATH) {
        println!("\n Clés existantes détectées — chargement...");
        let t = Instant::now();
        match load_keypair_json(KEYPAIR_JSON_PATH) {
            Ok(kp) => {
                println!(" Clés chargées depuis le disque  ({:.3?})\n", t.elapsed());
                return Ok((kp, None));
            }
            Err(e) => {
                println!("  Erreur de chargement ({}) — regénération...", e);
            }
        }
    }
    let (kp, duree) = generer_et_sauvegarder(bits)?;
    Ok((kp, Some(duree)))
}

fn generer_et_sauvegarder(bits: u64) -> Result<(KeyPair, Duration), AppError> {
    println!("\n Génération d'une paire de clés {} bits...", bits);
    let t = Instant::now();
    let kp = p_keygen(bits)?;
    let duree = t.elapsed();
    println!(" Clés générées en {:.3?}", duree);

    save_keypair_json(&kp, KEYPAIR_JSON_PATH)?;
    save_public_key_json(&kp.public_key, PUBLIC_KEY_JSON_PATH)?;
    save_secret_key_json(&kp.secret_key, SECRET_KEY_JSON_PATH)?;
    println!(" Clés sauvegardées dans {}/", KEYS_DIR);

    Ok((kp, duree))
}

fn afficher_cles(kp: &KeyPair) {
    println!("\n  Module n       : {} bits", kp.public_key.n.bits());
    println!("  Générateur g   : n + 1");
    println!("  lambda         : {} bits", kp.secret_key.lambda.bits());
    println!("  mu             : {} bits", kp.secret_key.mu.bits());
}

// ─────────────────────────────────────────────────────────
// [1] Démonstration Paillier : chiffrement, addition, déchiffrement
// ─────────────────────────────────────────────────────────

fn demonstration_paillier() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("  Cryptosystème de Paillier — Démonstration");
    println!("==============================================");

    let (kp, duree_keygen) = charger_ou_generer_cles(KEY_BITS)?;
    afficher_cles(&kp);

    let mut rng = OsRng;

    let m1 = rng.gen_biguint_below(&kp.public_key.n);
    let m2 = rng.gen_biguint_below(&kp.public_key.n);

    println!("\n  m1 = {} bits", m1.bits());
    println!("  m2 = {} bits", m2.bits());

    let t = Instant::now();
    let c1 = p_encrypt(&m1, &kp.public_key)?;
    let duree_enc_m1 = t.elapsed();

    let t = Instant::now();
    let c2 = p_encrypt(&m2, &kp.public_key)?;
    let duree_enc_m2 = t.elapsed();

    println!("\n  Chiffrement m1 : {:.3?}", duree_enc_m1);
    println!("  Chiffrement m2 : {:.3?}", duree_enc_m2);

    // ── Addition homomorphique ────────────────────────────────────────
    let t = Instant::now();
    let c_somme = p_add(&c1, &c2, &kp.public_key)?;
    let duree_add = t.elapsed();
    println!("  Addition homomorphique : {:.3?}", duree_add);

    let t = Instant::now();
    let dec = p_decrypt(&c_somme, &kp.secret_key)?;
    let duree_dec = t.elapsed();
    println!("  Déchiffrement          : {:.3?}", duree_dec);

    let somme_attendue = (&m1 + &m2) % &kp.public_key.n;
    if dec == somme_attendue {
        println!("\n  Addition vérifiée : D(E(m1) · E(m2) mod n²) = m1 + m2 mod n");
    } else {
        println!("\n  Erreur dans l'addition homomorphique !");
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — Paillier");
    println!("==============================================");
    match duree_keygen {
        Some(d) => println!("  Génération des clés    : {:.3?}  (nouvelle génération)", d),
        None    => println!("  Génération des clés    : —  (chargées depuis le disque)"),
    }
    println!("  Chiffrement m1         : {:.3?}", duree_enc_m1);
    println!("  Chiffrement m2         : {:.3?}", duree_enc_m2);
    println!("  Addition homomorphique : {:.3?}", duree_add);
    println!("  Déchiffrement          : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}
