//! Serialized code-unit payloads as embedded in archives.
//!
//! An archive that carries executable definitions stores them under the
//! fixed member name [`UNIT_ENTRY`] as a MessagePack-encoded [`UnitImage`].
//! Resource-only archives simply have no such member.

use crate::error::{ResolveError, Result};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use std::collections::HashSet;

/// Archive member holding the serialized unit image.
pub const UNIT_ENTRY: &str = "unit.image";

/// Image format version understood by this build.
pub const IMAGE_VERSION: u32 = 1;

/// One named definition inside a code unit. The body is opaque to the
/// resolver; interpreting it belongs to the embedding runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    pub name: String,
    pub descriptor: String,
    pub body: ByteBuf,
}

impl UnitDef {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            body: ByteBuf::from(body),
        }
    }
}

/// The wire form of a code unit: a versioned list of definitions.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnitImage {
    pub version: u32,
    pub definitions: Vec<UnitDef>,
}

impl UnitImage {
    pub fn new(definitions: Vec<UnitDef>) -> Self {
        Self {
            version: IMAGE_VERSION,
            definitions,
        }
    }

    /// Decode and validate an image read out of an archive.
    ///
    /// Rejects unknown format versions and duplicate definition names;
    /// a unit must bind each qualified name at most once.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image: UnitImage = rmp_serde::from_slice(bytes)
            .map_err(|e| ResolveError::Image(format!("malformed unit image: {e}")))?;

        if image.version != IMAGE_VERSION {
            return Err(ResolveError::Image(format!(
                "unsupported image version {} (expected {})",
                image.version, IMAGE_VERSION
            )));
        }

        let mut seen = HashSet::new();
        for def in &image.definitions {
            if !seen.insert(def.name.as_str()) {
                return Err(ResolveError::Image(format!(
                    "duplicate definition '{}'",
                    def.name
                )));
            }
        }

        Ok(image)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| ResolveError::Image(format!("encode failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_duplicate_names() {
        let image = UnitImage::new(vec![
            UnitDef::new("com.acme.Widget", "class", vec![]),
            UnitDef::new("com.acme.Widget", "interface", vec![]),
        ]);
        let bytes = image.encode().unwrap();

        let err = UnitImage::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("duplicate definition"));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut image = UnitImage::new(vec![UnitDef::new("a.B", "class", vec![])]);
        image.version = IMAGE_VERSION + 7;
        let bytes = image.encode().unwrap();

        let err = UnitImage::decode(&bytes).unwrap_err();
        assert!(matches!(err, ResolveError::Image(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(UnitImage::decode(b"not a msgpack image").is_err());
    }
}
