//! Stretch and hash primitives
//!
//! Two pure operations sit under every key operation: a single round of the
//! provider's fixed-output hash, and a deliberately expensive password
//! stretch. Both are deterministic and side-effect free beyond CPU time.

use crate::provider::HashProvider;
use crate::{KeyError, Result};
use zeroize::Zeroizing;

/// Minimum stretched output length in bytes.
pub const MIN_STRETCH_LEN: usize = 8;

/// Maximum stretched output length in bytes.
pub const MAX_STRETCH_LEN: usize = 1024;

/// Run the provider's fixed-output hash once over `input`.
///
/// Fits arbitrary-width input into the provider's canonical output width.
/// This is a single hash round, not a derivation step.
///
/// # Errors
///
/// Fails only if the provider itself fails.
pub fn hash_once(provider: &dyn HashProvider, input: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    provider.hash_once(input).map(Zeroizing::new)
}

/// Stretch `password` with `salt` into `length` output bytes.
///
/// The stretch cost is intentional brute-force deterrence, not a transient
/// fault; callers must not retry.
///
/// # Errors
///
/// Returns [`KeyError::ShortKey`] when `length` is below
/// [`MIN_STRETCH_LEN`], [`KeyError::KeyOverstretch`] when it is above
/// [`MAX_STRETCH_LEN`], or the provider's own failure.
pub fn stretch_password(
    provider: &dyn HashProvider,
    password: &str,
    salt: &[u8],
    length: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if length < MIN_STRETCH_LEN {
        return Err(KeyError::ShortKey(length));
    }
    if length > MAX_STRETCH_LEN {
        return Err(KeyError::KeyOverstretch(length));
    }
    let mut out = Zeroizing::new(vec![0u8; length]);
    provider.stretch_password(password, salt, &mut out)?;
    Ok(out)
}
