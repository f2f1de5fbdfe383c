//! Derivation state machine behavior through the public API
//!
//! Runs the stretch at a reduced iteration count; fixed-vector coverage at
//! the default cost lives in the in-module unit tests.

use keytree::{Blake2bSha3, HashProvider, Key, KeyError, Result};

const TEST_ITERATIONS: u32 = 128;

fn root() -> Key {
    Key::root(Blake2bSha3::with_iterations(TEST_ITERATIONS))
}

/// Provider whose backend always fails, as an uninitialized HSM would.
struct FailingProvider;

impl HashProvider for FailingProvider {
    fn output_size(&self) -> usize {
        64
    }

    fn hash_once(&self, _input: &[u8]) -> Result<Vec<u8>> {
        Err(KeyError::Provider("hash backend unavailable".to_string()))
    }

    fn stretch_password(&self, _password: &str, _salt: &[u8], _out: &mut [u8]) -> Result<()> {
        Err(KeyError::Provider("hash backend unavailable".to_string()))
    }
}

/// Provider with an output width below the stretch minimum.
struct NarrowProvider;

impl HashProvider for NarrowProvider {
    fn output_size(&self) -> usize {
        4
    }

    fn hash_once(&self, _input: &[u8]) -> Result<Vec<u8>> {
        Ok(vec![0u8; 4])
    }

    fn stretch_password(&self, _password: &str, _salt: &[u8], out: &mut [u8]) -> Result<()> {
        out.fill(0);
        Ok(())
    }
}

#[test]
fn path_equals_segment_chain() {
    let key = root();

    let joined = key.derive_path("a/b").expect("joined path should derive");
    let chained = key
        .derive_path("a")
        .expect("first segment should derive")
        .derive_path("b")
        .expect("second segment should derive");

    assert_eq!(joined, chained);
    assert_eq!(joined.depth(), 2);
}

#[test]
fn segments_are_trimmed_and_empties_dropped() {
    let key = root();

    let canonical = key.derive_path("a/b").expect("path should derive");
    let padded = key.derive_path(" a / b ").expect("path should derive");
    let doubled = key.derive_path("a//b").expect("path should derive");

    assert_eq!(canonical, padded);
    assert_eq!(canonical, doubled);
}

#[test]
fn password_is_never_split() {
    let key = root();

    let password = key.derive_password("a/b").expect("password should derive");
    let path = key.derive_path("a/b").expect("path should derive");

    assert_eq!(password.depth(), 1);
    assert_eq!(path.depth(), 2);
    assert_ne!(password, path);
}

#[test]
fn depth_increases_by_one_per_step() {
    let key = root();
    assert_eq!(key.depth(), 0);

    let one = key.derive_password("a").expect("derivation should succeed");
    assert_eq!(one.depth(), 1);

    let two = one.derive_path("b").expect("derivation should succeed");
    assert_eq!(two.depth(), 2);

    let five = two.derive_path("c/d/e").expect("derivation should succeed");
    assert_eq!(five.depth(), 5);
}

#[test]
fn empty_path_is_identity() {
    let key = root().derive_path("a").expect("derivation should succeed");
    let same = key.derive_path("").expect("empty path is a no-op");
    assert_eq!(key, same);
}

#[test]
fn degenerate_path_fails() {
    assert!(matches!(root().derive_path("/"), Err(KeyError::PathInvalid)));
    assert!(matches!(
        root().derive_path("///"),
        Err(KeyError::PathInvalid)
    ));
    assert!(matches!(
        root().derive_path("   "),
        Err(KeyError::PathInvalid)
    ));
}

#[test]
fn finalization_blocks_derivation() {
    let mut key = root().derive_path("leaf").expect("derivation should succeed");
    key.finalize().expect("finalize should succeed");

    assert!(matches!(key.derive_path("x"), Err(KeyError::KeyFinalized)));
    assert!(matches!(key.derive_path(""), Err(KeyError::KeyFinalized)));
    assert!(matches!(
        key.derive_password("x"),
        Err(KeyError::KeyFinalized)
    ));
    assert!(matches!(key.finalize(), Err(KeyError::KeyFinalized)));
}

#[test]
fn finalized_copy_blocks_only_the_copy() {
    let key = root().derive_path("leaf").expect("derivation should succeed");
    let copy = key.finalized_copy();

    assert!(matches!(copy.derive_path("x"), Err(KeyError::KeyFinalized)));

    // The original stays derivable.
    let child = key.derive_path("x").expect("original is not finalized");
    assert_eq!(child.depth(), 2);
}

#[test]
fn root_ignores_finalization() {
    let mut key = root();
    let before = key.derive_password("pw").expect("derivation should succeed");

    key.finalize().expect("finalizing a root key succeeds");
    assert!(key.is_finalized());
    assert_eq!(key.depth(), 0);

    // The flag never blocks a root key.
    let after = key.derive_password("pw").expect("root bypasses the check");
    assert_eq!(after.depth(), 1);

    // But finalization did stamp the root's material, so children diverge.
    assert_ne!(before, after);

    key.finalize().expect("repeated finalize also succeeds");
}

#[test]
fn export_gating() {
    let mut key = root().derive_path("leaf").expect("derivation should succeed");
    assert!(matches!(key.bytes(), Err(KeyError::KeyNotFinal)));
    assert!(!key.is_finalized());

    key.finalize().expect("finalize should succeed");
    let exported = key.bytes().expect("finalized key exports its bytes");
    assert_eq!(exported.len(), 64);

    let again = key.bytes().expect("export is repeatable");
    assert_eq!(*exported, *again);
}

#[test]
fn finalize_and_finalized_copy_diverge() {
    let mut key = root().derive_path("leaf").expect("derivation should succeed");
    let copy = key.finalized_copy();
    key.finalize().expect("finalize should succeed");

    assert!(key.is_finalized());
    assert!(copy.is_finalized());

    let sealed = key.bytes().expect("export should succeed");
    let copied = copy.bytes().expect("export should succeed");
    assert_ne!(*sealed, *copied);
}

#[test]
fn derivation_is_deterministic() {
    let a = root().derive_path("users/alice").expect("derivation should succeed");
    let b = root().derive_path("users/alice").expect("derivation should succeed");
    assert_eq!(a, b);

    let c = root().derive_path("users/bob").expect("derivation should succeed");
    assert_ne!(a, c);
}

#[test]
fn provider_failure_surfaces() {
    let mut key = Key::root(FailingProvider);
    assert!(matches!(key.finalize(), Err(KeyError::Provider(_))));
    assert!(matches!(
        key.derive_password("pw"),
        Err(KeyError::Provider(_))
    ));
}

#[test]
fn sub_minimum_provider_width_is_rejected() {
    let key = Key::root(NarrowProvider);
    assert!(matches!(key.derive_path("a"), Err(KeyError::ShortKey(4))));
    assert!(matches!(
        key.derive_password("a"),
        Err(KeyError::ShortKey(4))
    ));
}
