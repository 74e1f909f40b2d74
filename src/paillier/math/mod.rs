// Réexporte les fonctions mathématiques du cœur Paillier

mod math;

pub use math::{
    l_function, gcd, lcm, mod_inverse,
    is_probable_prime, generate_prime,
    MIN_KEY_BITS,
};
