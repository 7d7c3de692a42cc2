//! Second pass: fixup resolution against the final layout.
//!
//! Once the bootstrap size is fixed, the base address of the machine-code
//! section is known and every recorded fixup site can be rewritten:
//! absolute references become two little-endian bytes, relative branches
//! a signed displacement byte. The resolver is the only component that
//! ever computes the base address — label offsets stay buffer-relative
//! everywhere else, so the two can never diverge.

#[allow(unused_imports)]
use alloc::format;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::emitter::{CodeSection, FixupKind};
use crate::error::PrgError;

/// Resolves fixup sites once the layout in front of the code is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    base: u16,
}

impl Resolver {
    /// Compute the machine-code base address from the load address and
    /// the bootstrap size.
    ///
    /// # Errors
    ///
    /// [`PrgError::AddressOverflow`] if the base leaves the 16-bit range.
    pub fn new(load_address: u16, bootstrap_len: usize) -> Result<Self, PrgError> {
        let base = load_address as u32 + bootstrap_len as u32;
        if base > 0xFFFF {
            return Err(PrgError::AddressOverflow { address: base });
        }
        Ok(Self { base: base as u16 })
    }

    /// The absolute address of the first machine-code byte.
    #[must_use]
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Rewrite every fixup site and return the patched bytes.
    ///
    /// # Errors
    ///
    /// [`PrgError::UnresolvedLabel`] if a fixup targets a label that was
    /// never marked, [`PrgError::AddressOverflow`] if a target address
    /// leaves the 16-bit range, [`PrgError::BranchRangeExceeded`] if a
    /// branch displacement falls outside `[-128, 127]`. Any error aborts
    /// the run; no partially patched output escapes.
    pub fn resolve(&self, section: CodeSection) -> Result<Vec<u8>, PrgError> {
        let (mut bytes, labels, fixups) = section.into_parts();

        for fixup in &fixups {
            let target_offset = match labels.get(&fixup.label) {
                Some(&off) => off,
                None => {
                    return Err(PrgError::UnresolvedLabel {
                        label: fixup.label.clone(),
                        offset: fixup.offset,
                    });
                }
            };
            let target = self.base as u32 + target_offset as u32;
            if target > 0xFFFF {
                return Err(PrgError::AddressOverflow { address: target });
            }

            match fixup.kind {
                FixupKind::AbsoluteLow => {
                    bytes[fixup.offset] = (target & 0xFF) as u8;
                }
                FixupKind::AbsoluteHigh => {
                    bytes[fixup.offset] = (target >> 8) as u8;
                }
                FixupKind::RelativeBranch => {
                    // The opcode byte sits one before the operand; the CPU
                    // measures the displacement from the following
                    // instruction, i.e. opcode address + 2.
                    let from = self.base as i32 + fixup.offset as i32 + 1;
                    let disp = target as i32 - from;
                    if !(-128..=127).contains(&disp) {
                        return Err(PrgError::BranchRangeExceeded {
                            label: fixup.label.clone(),
                            disp,
                            offset: fixup.offset,
                        });
                    }
                    bytes[fixup.offset] = disp as i8 as u8;
                }
            }
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::CodeEmitter;

    #[test]
    fn base_is_load_plus_bootstrap() {
        let resolver = Resolver::new(0x0801, 13).unwrap();
        assert_eq!(resolver.base(), 0x080E);
    }

    #[test]
    fn base_overflow_is_rejected() {
        assert!(matches!(
            Resolver::new(0xFFFE, 13),
            Err(PrgError::AddressOverflow { address: 0x1000B })
        ));
    }

    #[test]
    fn absolute_fixup_patches_little_endian() {
        let mut em = CodeEmitter::new();
        em.emit_byte(0x4C); // JMP
        em.reserve_absolute("data");
        em.mark_label("data").unwrap();
        em.emit_byte(0xFF);
        let resolver = Resolver::new(0x0801, 13).unwrap();
        let bytes = resolver.resolve(em.finish()).unwrap();
        // data at buffer offset 3, absolute $080E + 3 = $0811.
        assert_eq!(bytes, vec![0x4C, 0x11, 0x08, 0xFF]);
    }

    #[test]
    fn forward_branch_fixup_patches_displacement() {
        let mut em = CodeEmitter::new();
        em.emit_byte(0xF0); // BEQ
        em.reserve_branch("done").unwrap();
        em.emit(&[0xEA, 0xEA, 0xEA]);
        em.mark_label("done").unwrap();
        em.emit_byte(0x60);
        let resolver = Resolver::new(0x0801, 13).unwrap();
        let bytes = resolver.resolve(em.finish()).unwrap();
        // Operand at 1, target at 5: disp = 5 - 2 = 3.
        assert_eq!(bytes, vec![0xF0, 0x03, 0xEA, 0xEA, 0xEA, 0x60]);
    }

    #[test]
    fn forward_branch_out_of_range_is_rejected() {
        let mut em = CodeEmitter::new();
        em.emit_byte(0xF0);
        em.reserve_branch("far").unwrap();
        em.emit(&vec![0xEA; 200]);
        em.mark_label("far").unwrap();
        let resolver = Resolver::new(0x0801, 13).unwrap();
        let err = resolver.resolve(em.finish()).unwrap_err();
        // Operand at 1, target at 202: disp = 202 - 2 = 200.
        assert_eq!(
            err,
            PrgError::BranchRangeExceeded {
                label: "far".into(),
                disp: 200,
                offset: 1,
            }
        );
    }

    #[test]
    fn missing_label_is_rejected() {
        let mut em = CodeEmitter::new();
        em.emit_byte(0x4C);
        em.reserve_absolute("nowhere");
        let resolver = Resolver::new(0x0801, 13).unwrap();
        let err = resolver.resolve(em.finish()).unwrap_err();
        assert_eq!(
            err,
            PrgError::UnresolvedLabel {
                label: "nowhere".into(),
                offset: 1,
            }
        );
    }

    #[test]
    fn target_past_address_space_is_rejected() {
        let mut em = CodeEmitter::new();
        em.emit_byte(0x4C);
        em.reserve_absolute("end");
        em.emit(&vec![0x00; 16]);
        em.mark_label("end").unwrap();
        let resolver = Resolver::new(0xFFF0, 2).unwrap();
        assert!(matches!(
            resolver.resolve(em.finish()),
            Err(PrgError::AddressOverflow { .. })
        ));
    }
}
