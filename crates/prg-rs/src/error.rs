//! Error types for layout, resolution, and output failures.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use core::fmt;

/// Generation error — every variant is fatal to the current run.
///
/// The engine aborts on the first error and produces no partial output;
/// generation is deterministic, so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrgError {
    /// The autorun-line digit-count fixed point failed to converge.
    ///
    /// For any 16-bit load address convergence takes at most two
    /// iterations; hitting the bound means the line-overhead constants
    /// have been changed inconsistently.
    LayoutOverflow {
        /// Load address the stub was being built for.
        load_address: u16,
        /// The iteration bound that was exhausted.
        iterations: usize,
    },

    /// A relative branch target falls outside the signed 8-bit range.
    BranchRangeExceeded {
        /// The target label name.
        label: String,
        /// The actual displacement to the target.
        disp: i32,
        /// Buffer offset of the branch operand byte.
        offset: usize,
    },

    /// A fixup references a label that was never marked.
    ///
    /// This is an internal consistency bug in the emission sequence,
    /// not a user error.
    UnresolvedLabel {
        /// The missing label name.
        label: String,
        /// Buffer offset of the fixup site.
        offset: usize,
    },

    /// A label was marked more than once.
    DuplicateLabel {
        /// The duplicated label name.
        label: String,
        /// Buffer offset of the second definition.
        offset: usize,
        /// Buffer offset of the first definition.
        first_offset: usize,
    },

    /// A derived absolute address left the 16-bit address space.
    AddressOverflow {
        /// The out-of-range address.
        address: u32,
    },

    /// The destination file could not be created or written.
    #[cfg(feature = "std")]
    Io {
        /// The destination path.
        path: String,
        /// The underlying OS error message.
        msg: String,
    },
}

impl fmt::Display for PrgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrgError::LayoutOverflow {
                load_address,
                iterations,
            } => {
                write!(
                    f,
                    "autorun line length did not stabilize within {} iterations (load address ${:04X})",
                    iterations, load_address
                )
            }
            PrgError::BranchRangeExceeded {
                label,
                disp,
                offset,
            } => {
                write!(
                    f,
                    "branch to '{}' at offset {} out of range (displacement={}, max=±127)",
                    label, offset, disp
                )
            }
            PrgError::UnresolvedLabel { label, offset } => {
                write!(f, "fixup at offset {} references unknown label '{}'", offset, label)
            }
            PrgError::DuplicateLabel {
                label,
                offset,
                first_offset,
            } => {
                write!(
                    f,
                    "duplicate label '{}' at offset {} (first marked at offset {})",
                    label, offset, first_offset
                )
            }
            PrgError::AddressOverflow { address } => {
                write!(f, "address ${:X} exceeds the 16-bit address space", address)
            }
            #[cfg(feature = "std")]
            PrgError::Io { path, msg } => {
                write!(f, "cannot write '{}': {}", path, msg)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PrgError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_overflow_display() {
        let err = PrgError::LayoutOverflow {
            load_address: 0x0801,
            iterations: 5,
        };
        assert_eq!(
            format!("{}", err),
            "autorun line length did not stabilize within 5 iterations (load address $0801)"
        );
    }

    #[test]
    fn branch_range_display() {
        let err = PrgError::BranchRangeExceeded {
            label: "done".into(),
            disp: 201,
            offset: 9,
        };
        assert_eq!(
            format!("{}", err),
            "branch to 'done' at offset 9 out of range (displacement=201, max=±127)"
        );
    }

    #[test]
    fn unresolved_label_display() {
        let err = PrgError::UnresolvedLabel {
            label: "waitkey".into(),
            offset: 18,
        };
        assert_eq!(
            format!("{}", err),
            "fixup at offset 18 references unknown label 'waitkey'"
        );
    }

    #[test]
    fn duplicate_label_display() {
        let err = PrgError::DuplicateLabel {
            label: "loop".into(),
            offset: 20,
            first_offset: 5,
        };
        assert_eq!(
            format!("{}", err),
            "duplicate label 'loop' at offset 20 (first marked at offset 5)"
        );
    }

    #[test]
    fn address_overflow_display() {
        let err = PrgError::AddressOverflow { address: 0x1_0002 };
        assert_eq!(
            format!("{}", err),
            "address $10002 exceeds the 16-bit address space"
        );
    }
}
