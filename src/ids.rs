//! Identifier Module
//!
//! Generates the opaque identifiers handed out for new sessions.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

// == Constants ==
/// Number of random bytes behind each identifier (256 bits).
pub const ID_ENTROPY_BYTES: usize = 32;

// == Id Generator Trait ==
/// Produces fresh, unguessable identifiers.
pub trait IdGenerator: Send + Sync + std::fmt::Debug {
    fn generate(&self) -> String;
}

// == Random Id Generator ==
/// URL-safe identifiers drawn from the thread-local CSPRNG.
///
/// Every identifier is exactly 43 characters of unpadded base64url.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; ID_ENTROPY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
