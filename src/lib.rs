//! # keytree
//!
//! Hierarchical, deterministic secret keys derived from a single root secret.
//!
//! A tree of independent keys grows out of one root: slash separated paths
//! pin keys to resources, free-form passwords mix in user secrets, and an
//! explicit finalization step seals a key before its raw bytes can be
//! exported. Nothing but the root secret and the derivation steps needs to
//! be stored; every key is recomputed on demand.
//!
//! Useful when a single user password must secure multiple resources
//! independently, or when a server owner wants to layer their own secret
//! under per-user passwords.
//!
//! ## Features
//!
//! - **Path derivation**: `/`-separated, whitespace-trimmed segments, one
//!   derivation step per segment
//! - **Password derivation**: the whole input is one opaque secret, never
//!   split
//! - **Finalization**: seals a key against further derivation and unlocks
//!   material export
//! - **Serialization**: fixed-layout binary state as unpadded base64 text
//! - **Injected hash suite**: BLAKE2b-512 + PBKDF2-HMAC-SHA3-512 by
//!   default, swappable through [`HashProvider`]
//!
//! ## Quick Start
//!
//! ```rust
//! use keytree::{Blake2bSha3, Key};
//!
//! # fn main() -> keytree::Result<()> {
//! let root = Key::root(Blake2bSha3::new());
//!
//! // One stretch step per path segment; depth 3, different material per user.
//! let mut mail_key = root.derive_path("users/alice/mail")?;
//!
//! // Seal it, then read the secret out.
//! mail_key.finalize()?;
//! let secret = mail_key.bytes()?;
//! assert_eq!(secret.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! Derivation cost is a feature: every step runs a PBKDF2 stretch at a
//! deliberately expensive iteration count (see
//! [`DEFAULT_ITERATIONS`]). Tune it down with
//! [`Blake2bSha3::with_iterations`] for constrained environments or tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod kdf;
pub mod key;
pub mod provider;
mod serialize;

pub use error::{KeyError, Result};
pub use key::Key;
pub use provider::{Blake2bSha3, HashProvider, DEFAULT_ITERATIONS};
