//! Token secret generation.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Random bytes per generated secret; base64 encoding yields 44 text-safe
/// characters.
const SECRET_BYTES: usize = 32;

/// Generate a fresh base64-encoded secret from the thread CSPRNG.
///
/// When `TALAWA_INIT_TEST_SEED` is set, a seeded generator is used instead so
/// golden tests produce stable values.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];

    if let Ok(seed_str) = std::env::var("TALAWA_INIT_TEST_SEED")
        && let Ok(seed) = seed_str.parse::<u64>()
    {
        StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    } else {
        rand::rng().fill_bytes(&mut bytes);
    }

    STANDARD.encode(bytes)
}
