//! Pluggable hash suite backing all derivation operations
//!
//! A [`HashProvider`] bundles the fixed-output hash, its output width and the
//! password-stretch function. It is injected once when a root key is
//! constructed, so swapping algorithms or tuning the stretch cost never
//! touches shared state.

use crate::Result;
use blake2::Blake2b512;
use digest::Digest;
use pbkdf2::pbkdf2_hmac;
use sha3::Sha3_512;

/// Default PBKDF2 iteration count for password stretching.
///
/// Deliberately expensive, a single stretch takes a few hundred milliseconds
/// on commodity hardware. Lower it through
/// [`Blake2bSha3::with_iterations`] on constrained targets or in tests.
pub const DEFAULT_ITERATIONS: u32 = 150_000;

/// Hash suite used by every derivation, finalization and stretch call.
///
/// Implementations must be deterministic: identical inputs always produce
/// identical output.
pub trait HashProvider: Send + Sync {
    /// Output width in bytes of [`hash_once`](HashProvider::hash_once).
    ///
    /// This is also the canonical width of derived key material.
    fn output_size(&self) -> usize;

    /// Run the fixed-output hash once over `input`.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying hash fails to initialize or compute.
    fn hash_once(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Fill `out` with bytes stretched from `password` and `salt`.
    ///
    /// Uses a PBKDF2-class function over a hash distinct from
    /// [`hash_once`](HashProvider::hash_once). Output length bounds are
    /// enforced by the caller, not here.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying password-hash fails.
    fn stretch_password(&self, password: &str, salt: &[u8], out: &mut [u8]) -> Result<()>;
}

/// Default hash suite: BLAKE2b-512 hashing with PBKDF2-HMAC-SHA3-512
/// password stretching.
#[derive(Debug, Clone)]
pub struct Blake2bSha3 {
    iterations: u32,
}

impl Blake2bSha3 {
    /// Create the default suite at [`DEFAULT_ITERATIONS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Create the suite with a custom stretch iteration count.
    #[must_use]
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Configured PBKDF2 iteration count.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for Blake2bSha3 {
    fn default() -> Self {
        Self::new()
    }
}

impl HashProvider for Blake2bSha3 {
    fn output_size(&self) -> usize {
        <Blake2b512 as Digest>::output_size()
    }

    fn hash_once(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(Blake2b512::digest(input).to_vec())
    }

    fn stretch_password(&self, password: &str, salt: &[u8], out: &mut [u8]) -> Result<()> {
        pbkdf2_hmac::<Sha3_512>(password.as_bytes(), salt, self.iterations, out);
        Ok(())
    }
}
