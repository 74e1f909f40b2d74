use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use num_integer::Integer;
use rand_core::OsRng;
use rand_core::RngCore;
use crate::crypto_error::crypto_error::CryptoError;

// Taille minimale de clé acceptée
pub const MIN_KEY_BITS: u64 = 16;

// Plafond de candidats par bit de taille demandée : l'espérance du nombre
// d'essais est O(nbits) (théorème des nombres premiers), le plafond est
// plusieurs ordres de grandeur au-dessus.
const PRIME_SEARCH_ATTEMPTS_PER_BIT: u64 = 64;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire, couvre jusqu'à 997)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,
];

// Fonction L(u) = (u-1)/n
//
// Précondition (non vérifiée en release) : u ≡ 1 (mod n). Hors de cette
// condition le quotient n'a aucune signification. u = 0 (chiffré malformé)
// ferait déborder u - 1 sur BigUint, d'où le garde.
pub fn l_function(u: &BigUint, n: &BigUint) -> BigUint {
    debug_assert!(
        u % n == BigUint::one() % n,
        "l_function : u doit être ≡ 1 (mod n)"
    );
    if u.is_zero() {
        return BigUint::zero();
    }
    (u - BigUint::one()) / n
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin
// Probabilité de faux positif <= 4^-rounds.
// ---------------------------------------------------------------------------
fn miller_rabin_rounds(_nbits: u64) -> u32 {
    5
}

// ---------------------------------------------------------------------------
// Génération d'un nombre premier probable de exactement nbits bits.
//
// Le bit de poids fort et le bit 0 de chaque candidat sont forcés : un
// premier retourné a toujours nbits bits, et n = p·q a 2·nbits ou
// 2·nbits - 1 bits.
//
// La boucle est plafonnée : si aucun candidat n'est accepté après
// nbits * PRIME_SEARCH_ATTEMPTS_PER_BIT tirages (source aléatoire dégénérée),
// on retourne Err(PrimeGenerationTimeout) plutôt que de tourner sans fin.
// ---------------------------------------------------------------------------
pub fn generate_prime(nbits: u64) -> Result<BigUint, CryptoError> {
    if nbits < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum: MIN_KEY_BITS,
        });
    }

    let mut rng = OsRng;
    let rounds = miller_rabin_rounds(nbits);
    let max_attempts = nbits.saturating_mul(PRIME_SEARCH_ATTEMPTS_PER_BIT);

    for _ in 0..max_attempts {
        let mut candidate = rng.gen_biguint(nbits);
        candidate.set_bit(nbits - 1, true); // MSB : garantit exactement nbits bits
        candidate.set_bit(0, true);         // impair

        // Crible par divisions d'essai avant le test coûteux
        if is_divisible_by_small_prime(&candidate) {
            continue;
        }

        if is_probable_prime(&candidate, rounds, &mut rng) {
            return Ok(candidate);
        }
    }

    Err(CryptoError::PrimeGenerationTimeout {
        attempts: max_attempts,
    })
}

// Vérifie si n est divisible par un des petits premiers de la table.
fn is_divisible_by_small_prime(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        let bp = BigUint::from(p);
        // n égal au petit premier lui-même : vrai premier, ne pas rejeter
        if n == &bp {
            return false;
        }
        if (n % &bp).is_zero() {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Test de primalité Miller-Rabin.
//
// Écrit n - 1 = 2^r · d avec d impair, puis effectue `rounds` tests de
// témoin indépendants. Un témoin qui n'atteint jamais d'état acceptant
// prouve la composition : retour false immédiat. Si tous les témoins
// passent, n est premier avec probabilité d'erreur <= 4^-rounds.
//
// Les cas n <= 3 et n pair sont traités avant la boucle (le tirage de
// témoin dans [2, n-2) dégénérerait).
// ---------------------------------------------------------------------------
pub fn is_probable_prime(n: &BigUint, rounds: u32, rng: &mut impl RngCore) -> bool {
    if n <= &BigUint::one() { return false; }
    if n == &BigUint::from(2u32) || n == &BigUint::from(3u32) { return true; }
    if n.is_even() { return false; }
    for &p in SMALL_PRIMES {
        if n == &BigUint::from(p) { return true; }
    }
    if n < &BigUint::from(5u32) { return false; }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(
            &BigUint::from(2u32),
            &(n - BigUint::from(2u32)),
        );
        let mut x = a.modpow(&d, n);
        if x == BigUint::one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a, n) != 1.
// Cas particulier n = 1 : l'anneau est trivial, l'inverse vaut 0.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    let (g, x, _) = extended_gcd(a, n);
    if g != BigUint::one() {
        return Err(CryptoError::NoModularInverse);
    }

    use num_bigint::BigInt;
    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint().ok_or(CryptoError::NegativeConversion)
}

fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, num_bigint::BigInt, num_bigint::BigInt) {
    use num_bigint::BigInt;

    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while r != BigInt::zero() {
        let quotient = &old_r / &r;

        let temp_r = r.clone();
        r = old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = old_t - &quotient * &t;
        old_t = temp_t;
    }

    let gcd_val = old_r.to_biguint().unwrap_or_default();

    (gcd_val, old_s, old_t)
}

// ===========================================================================
// Tests unitaires
// ===========================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // Rounds élevés pour rendre le risque de faux positif négligeable
    // dans les assertions (4^-20).
    const TEST_ROUNDS: u32 = 20;

    #[test]
    fn test_primality_known_composites() {
        let mut rng = OsRng;
        // 561 = 3·11·17 est un nombre de Carmichael : il piège le test de
        // Fermat mais pas Miller-Rabin.
        for n in [0u32, 1, 4, 6, 8, 9, 15, 561] {
            assert!(
                !is_probable_prime(&BigUint::from(n), TEST_ROUNDS, &mut rng),
                "{n} déclaré premier"
            );
        }
    }

    #[test]
    fn test_primality_known_primes() {
        let mut rng = OsRng;
        for n in [2u32, 3, 5, 7, 104_729] {
            assert!(
                is_probable_prime(&BigUint::from(n), TEST_ROUNDS, &mut rng),
                "{n} déclaré composé"
            );
        }
    }

    #[test]
    fn test_generate_prime_exact_bit_length() {
        let p = generate_prime(32).unwrap();
        assert_eq!(p.bits(), 32);
        assert!(p.is_odd());
        let mut rng = OsRng;
        assert!(is_probable_prime(&p, TEST_ROUNDS, &mut rng));
    }

    #[test]
    fn test_generate_prime_rejects_small_sizes() {
        assert!(matches!(
            generate_prime(8),
            Err(CryptoError::KeySizeTooSmall { requested: 8, minimum: MIN_KEY_BITS })
        ));
    }

    #[test]
    fn test_mod_inverse_basic() {
        // 3 · 4 = 12 ≡ 1 (mod 11)
        let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inv, BigUint::from(4u32));
    }

    #[test]
    fn test_mod_inverse_fails_when_gcd_not_one() {
        assert_eq!(
            mod_inverse(&BigUint::from(2u32), &BigUint::from(4u32)),
            Err(CryptoError::NoModularInverse)
        );
    }

    #[test]
    fn test_mod_inverse_modulus_one() {
        let inv = mod_inverse(&BigUint::from(5u32), &BigUint::one()).unwrap();
        assert_eq!(inv, BigUint::zero());
    }

    #[test]
    fn test_l_function_exact_division() {
        // u = 1 + 3·7 = 22 : L(22, 7) = 3
        let u = BigUint::from(22u32);
        let n = BigUint::from(7u32);
        assert_eq!(l_function(&u, &n), BigUint::from(3u32));
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(&BigUint::from(12u32), &BigUint::from(18u32)), BigUint::from(6u32));
        assert_eq!(lcm(&BigUint::from(4u32), &BigUint::from(6u32)), BigUint::from(12u32));
    }
}
