//! Hierarchical deterministic key entity and its derivation state machine

use crate::kdf;
use crate::provider::HashProvider;
use crate::{KeyError, Result};
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// A hierarchical, deterministic key.
///
/// A key is one node in an unbounded tree grown from a single root secret.
/// Children are derived through slash separated paths or free-form
/// passwords; each derivation step produces a new, independent key one level
/// deeper. Finalization seals a key against further derivation, and only a
/// finalized key will hand out its raw material.
///
/// Keys are value types: derivation never mutates the key it derives from,
/// and no parent/child references are kept. The hash suite injected at root
/// construction is shared by every key in the tree.
#[derive(Clone)]
pub struct Key {
    pub(crate) provider: Arc<dyn HashProvider>,
    pub(crate) material: Zeroizing<Vec<u8>>,
    pub(crate) depth: u64,
    pub(crate) finalized: bool,
}

impl Key {
    /// Create an empty root key backed by `provider`.
    ///
    /// A root key holds no secret of its own and is not safe to use
    /// directly; derive children from it to obtain secure keys.
    #[must_use]
    pub fn root(provider: impl HashProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            material: Zeroizing::new(Vec::new()),
            depth: 0,
            finalized: false,
        }
    }

    /// Gate run before every derivation and finalization: checks the
    /// finalized flag and returns material normalized to the canonical
    /// hash width, for use as the next salt.
    ///
    /// Root keys bypass both the check and the normalization, whatever
    /// their flag or material say.
    fn padded(&self) -> Result<Zeroizing<Vec<u8>>> {
        if self.depth == 0 {
            return Ok(self.material.clone());
        }
        if self.finalized {
            return Err(KeyError::KeyFinalized);
        }
        if self.material.len() != self.provider.output_size() {
            return kdf::hash_once(self.provider.as_ref(), &self.material);
        }
        Ok(self.material.clone())
    }

    /// Derive a key from a slash separated path.
    ///
    /// The path is split on `/`, each segment is trimmed of surrounding
    /// whitespace, and empty segments are dropped. Every surviving segment
    /// is one password-stretch step against the running material, so
    /// `derive_path("a/b")` equals `derive_path("a")` then
    /// `derive_path("b")`. An empty path returns the key unchanged.
    ///
    /// # Errors
    ///
    /// [`KeyError::KeyFinalized`] on a finalized non-root key,
    /// [`KeyError::PathInvalid`] when a non-empty path collapses to zero
    /// usable segments, or a stretch failure.
    pub fn derive_path(&self, path: &str) -> Result<Key> {
        let mut material = self.padded()?;

        if path.is_empty() {
            return Ok(self.clone());
        }

        let segments: Vec<&str> = path
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            return Err(KeyError::PathInvalid);
        }

        let width = self.provider.output_size();
        let mut depth = self.depth;
        for segment in &segments {
            material = kdf::stretch_password(self.provider.as_ref(), segment, &material, width)?;
            depth += 1;
        }
        tracing::debug!(segments = segments.len(), depth, "derived key by path");

        Ok(Key {
            provider: Arc::clone(&self.provider),
            material,
            depth,
            finalized: false,
        })
    }

    /// Derive a key from a password.
    ///
    /// Unlike [`derive_path`](Key::derive_path) the input is never split:
    /// the whole string, slashes included, is one opaque secret. Use this
    /// for user passwords and similar inputs, not for derivation paths.
    ///
    /// # Errors
    ///
    /// [`KeyError::KeyFinalized`] on a finalized non-root key, or a stretch
    /// failure.
    pub fn derive_password(&self, password: &str) -> Result<Key> {
        let salt = self.padded()?;
        let material = kdf::stretch_password(
            self.provider.as_ref(),
            password,
            &salt,
            self.provider.output_size(),
        )?;
        tracing::debug!(depth = self.depth + 1, "derived key by password");

        Ok(Key {
            provider: Arc::clone(&self.provider),
            material,
            depth: self.depth + 1,
            finalized: false,
        })
    }

    /// Seal this key against further derivation.
    ///
    /// The material is stamped with one last hash round, so a finalized key
    /// never carries the same bytes as the derived key it came from.
    /// Recommended on all leaf keys to prevent accidents.
    ///
    /// A root key does not refuse finalization, but the flag never blocks
    /// it either: deriving from a finalized root still succeeds.
    ///
    /// # Errors
    ///
    /// [`KeyError::KeyFinalized`] when a non-root key is already finalized,
    /// or a provider failure.
    pub fn finalize(&mut self) -> Result<()> {
        let material = self.padded()?;
        self.material = kdf::hash_once(self.provider.as_ref(), &material)?;
        self.finalized = true;
        tracing::debug!(depth = self.depth, "finalized key");
        Ok(())
    }

    /// Copy of this key marked finalized, without the extra hash round.
    ///
    /// Useful to read the bytes of an intermediate key while keeping the
    /// original derivable. The copy's material is bit-identical to this
    /// key's, which a true [`finalize`](Key::finalize) never is.
    #[must_use]
    pub fn finalized_copy(&self) -> Key {
        Key {
            provider: Arc::clone(&self.provider),
            material: self.material.clone(),
            depth: self.depth,
            finalized: true,
        }
    }

    /// Copy of the raw key material.
    ///
    /// # Errors
    ///
    /// [`KeyError::KeyNotFinal`] unless the key is finalized.
    pub fn bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        if !self.finalized {
            return Err(KeyError::KeyNotFinal);
        }
        Ok(self.material.clone())
    }

    /// Number of derivation steps between this key and its root.
    ///
    /// Lower is better: each level stretches the root entropy thinner.
    #[must_use]
    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// Whether the key is sealed and its material can be exported.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("depth", &self.depth)
            .field("finalized", &self.finalized)
            .field("material", &format_args!("[{} bytes]", self.material.len()))
            .finish()
    }
}

impl PartialEq for Key {
    /// Material comparison is constant time. The provider is not part of a
    /// key's identity.
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.material.as_slice().ct_eq(other.material.as_slice()))
            && self.depth == other.depth
            && self.finalized == other.finalized
    }
}

impl Eq for Key {}
