//! Append-only code emission with labels and fixup recording.
//!
//! First pass of the two-pass engine: instruction and data bytes are
//! appended to a growing buffer, named positions are recorded in a label
//! table, and every operand whose value depends on the not-yet-known base
//! address is written as a placeholder with a [`FixupSite`] pointing at
//! it. The frozen result ([`CodeSection`]) is handed to the resolver for
//! the second pass.

use alloc::collections::BTreeMap;
#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::error::PrgError;

// ─── Fixups ────────────────────────────────────────────────

/// What kind of value a fixup site needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixupKind {
    /// Low byte of `base + label offset`.
    AbsoluteLow,
    /// High byte of `base + label offset`.
    AbsoluteHigh,
    /// Signed one-byte displacement from the instruction after the
    /// branch, i.e. `target - (operand address + 1)`.
    RelativeBranch,
}

/// A buffer position whose final value depends on an address not known
/// at emission time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixupSite {
    /// Buffer offset of the placeholder byte.
    pub offset: usize,
    /// How to compute the byte once the base address is known.
    pub kind: FixupKind,
    /// The label whose position the value derives from.
    pub label: String,
}

// ─── CodeEmitter ───────────────────────────────────────────

/// Single-pass code emitter: append-only buffer, label table, fixup list.
///
/// Offsets returned by [`emit`](CodeEmitter::emit) are stable for the
/// whole run; bytes are never removed or reordered, and the buffer is
/// only mutated afterwards by the resolver, at recorded fixup offsets.
#[derive(Debug, Default)]
pub struct CodeEmitter {
    bytes: Vec<u8>,
    labels: BTreeMap<String, usize>,
    fixups: Vec<FixupSite>,
}

impl CodeEmitter {
    /// Create an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer length — the offset the next byte will land at.
    #[must_use]
    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    /// Append raw bytes; returns the offset they were written at.
    pub fn emit(&mut self, bytes: &[u8]) -> usize {
        let at = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        at
    }

    /// Append a single byte; returns the offset it was written at.
    pub fn emit_byte(&mut self, byte: u8) -> usize {
        let at = self.bytes.len();
        self.bytes.push(byte);
        at
    }

    /// Record the current position under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PrgError::DuplicateLabel`] if `name` was already marked.
    pub fn mark_label(&mut self, name: &str) -> Result<usize, PrgError> {
        let at = self.bytes.len();
        if let Some(&first) = self.labels.get(name) {
            return Err(PrgError::DuplicateLabel {
                label: String::from(name),
                offset: at,
                first_offset: first,
            });
        }
        self.labels.insert(String::from(name), at);
        Ok(at)
    }

    /// Look up a label's buffer offset, if already marked.
    #[must_use]
    pub fn label_offset(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Reserve a two-byte little-endian absolute-address operand
    /// targeting `label`; returns the offset of the low byte.
    ///
    /// Absolute operands always record fixups, even for labels already
    /// marked: their value needs the base address, which only the
    /// resolver knows.
    pub fn reserve_absolute(&mut self, label: &str) -> usize {
        let lo = self.emit_byte(0x00);
        self.fixups.push(FixupSite {
            offset: lo,
            kind: FixupKind::AbsoluteLow,
            label: String::from(label),
        });
        let hi = self.emit_byte(0x00);
        self.fixups.push(FixupSite {
            offset: hi,
            kind: FixupKind::AbsoluteHigh,
            label: String::from(label),
        });
        lo
    }

    /// Reserve a one-byte relative-branch operand targeting `label`;
    /// returns the offset of the operand byte.
    ///
    /// A backward reference (label already marked) is resolved on the
    /// spot with no fixup entry — the displacement is independent of the
    /// base address. Forward references record a
    /// [`FixupKind::RelativeBranch`] fixup.
    ///
    /// # Errors
    ///
    /// Returns [`PrgError::BranchRangeExceeded`] if a backward target is
    /// beyond the signed 8-bit range.
    pub fn reserve_branch(&mut self, label: &str) -> Result<usize, PrgError> {
        let at = self.bytes.len();
        if let Some(&target) = self.labels.get(label) {
            // Displacement is measured from the instruction after the
            // two-byte branch: operand at `at`, next instruction at `at + 1`.
            let disp = target as i32 - (at as i32 + 1);
            if !(-128..=127).contains(&disp) {
                return Err(PrgError::BranchRangeExceeded {
                    label: String::from(label),
                    disp,
                    offset: at,
                });
            }
            self.emit_byte(disp as i8 as u8);
        } else {
            self.emit_byte(0x00);
            self.fixups.push(FixupSite {
                offset: at,
                kind: FixupKind::RelativeBranch,
                label: String::from(label),
            });
        }
        Ok(at)
    }

    /// Freeze the emitter into a read-only [`CodeSection`].
    #[must_use]
    pub fn finish(self) -> CodeSection {
        CodeSection {
            bytes: self.bytes,
            labels: self.labels,
            fixups: self.fixups,
        }
    }
}

// ─── CodeSection ───────────────────────────────────────────

/// The frozen output of an emission pass.
///
/// Offsets are final; only the resolver mutates the bytes, and only at
/// the recorded fixup offsets.
#[derive(Debug, Clone)]
pub struct CodeSection {
    bytes: Vec<u8>,
    labels: BTreeMap<String, usize>,
    fixups: Vec<FixupSite>,
}

impl CodeSection {
    /// The emitted bytes (fixup sites still hold placeholders).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte count of the section.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The recorded fixup sites, in emission order.
    #[must_use]
    pub fn fixups(&self) -> &[FixupSite] {
        &self.fixups
    }

    /// Look up a label's buffer offset.
    #[must_use]
    pub fn label_offset(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, BTreeMap<String, usize>, Vec<FixupSite>) {
        (self.bytes, self.labels, self.fixups)
    }
}
