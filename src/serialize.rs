//! Fixed-layout binary serialization of key state
//!
//! Layout, in order: material (canonical hash width) ‖ depth as an 8 byte
//! little-endian unsigned integer ‖ one flag byte, `0x01` when finalized.
//! The buffer travels as unpadded standard-alphabet base64 text.
//!
//! The format carries no version or integrity field; tampering and format
//! migration are the integrating application's problem.

use crate::key::Key;
use crate::{KeyError, Result};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use zeroize::Zeroizing;

// 8 byte depth plus 1 flag byte after the material.
const TRAILER_LEN: usize = 9;

impl Key {
    /// Encode material, depth and finalization flag as unpadded base64.
    ///
    /// # Errors
    ///
    /// [`KeyError::MaterialNotDerived`] when the material is not exactly the
    /// canonical hash width, as on a root key that was never derived from.
    pub fn serialize(&self) -> Result<String> {
        let width = self.provider.output_size();
        if self.material.len() != width {
            return Err(KeyError::MaterialNotDerived);
        }

        let mut buf = Zeroizing::new(Vec::with_capacity(width + TRAILER_LEN));
        buf.extend_from_slice(&self.material);
        buf.extend_from_slice(&self.depth.to_le_bytes());
        buf.push(u8::from(self.finalized));

        Ok(STANDARD_NO_PAD.encode(buf.as_slice()))
    }

    /// Overwrite this key's state from its serialized representation.
    ///
    /// Material, depth and finalization flag are replaced wholesale; the
    /// hash suite is kept. Any flag byte other than `0x01` reads as not
    /// finalized. No consistency is enforced beyond the base64 decode and
    /// the total length.
    ///
    /// # Errors
    ///
    /// [`KeyError::BadEncoding`] when the input is not valid base64, or
    /// [`KeyError::BadLayout`] when it decodes to the wrong length.
    pub fn deserialize(&mut self, raw: &str) -> Result<()> {
        let data = Zeroizing::new(STANDARD_NO_PAD.decode(raw)?);

        let width = self.provider.output_size();
        let expected = width + TRAILER_LEN;
        if data.len() != expected {
            return Err(KeyError::BadLayout {
                expected,
                actual: data.len(),
            });
        }

        let mut depth_bytes = [0u8; 8];
        depth_bytes.copy_from_slice(&data[width..width + 8]);

        self.material = Zeroizing::new(data[..width].to_vec());
        self.depth = u64::from_le_bytes(depth_bytes);
        self.finalized = data[expected - 1] == 0x01;
        tracing::trace!(
            depth = self.depth,
            finalized = self.finalized,
            "deserialized key state"
        );
        Ok(())
    }
}
