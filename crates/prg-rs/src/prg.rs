//! Final .PRG packaging and the file sink.
//!
//! A .PRG file is the 2-byte little-endian load address followed by the
//! payload exactly as it will sit in memory. Packaging is pure
//! concatenation — every address inside the payload was already resolved.

#[allow(unused_imports)]
use alloc::format;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "std")]
use crate::error::PrgError;

/// A complete, resolved loadable image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct PrgImage {
    bytes: Vec<u8>,
    load_address: u16,
    entry: Option<u16>,
}

impl PrgImage {
    /// Concatenate load-address header, bootstrap, and machine code.
    pub(crate) fn assemble(
        load_address: u16,
        bootstrap: &[u8],
        code: &[u8],
        entry: Option<u16>,
    ) -> Self {
        let mut bytes = Vec::with_capacity(2 + bootstrap.len() + code.len());
        bytes.extend_from_slice(&load_address.to_le_bytes());
        bytes.extend_from_slice(bootstrap);
        bytes.extend_from_slice(code);
        Self {
            bytes,
            load_address,
            entry,
        }
    }

    /// The full file content, header included.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the file content.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// An image always carries at least its load-address header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The address the target machine loads the body at.
    #[must_use]
    pub fn load_address(&self) -> u16 {
        self.load_address
    }

    /// Machine-code entry address, if the payload has machine code.
    #[must_use]
    pub fn entry(&self) -> Option<u16> {
        self.entry
    }

    /// Write the image to `path` in one operation.
    ///
    /// The image was fully assembled in memory beforehand, so a failing
    /// run never leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// [`PrgError::Io`] if the destination cannot be created or written.
    #[cfg(feature = "std")]
    pub fn write_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PrgError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|e| PrgError::Io {
            path: path.display().to_string(),
            msg: e.to_string(),
        })
    }
}
