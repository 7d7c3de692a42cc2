//! BASIC autorun line construction.
//!
//! The `SYS` line is self-referential: its byte length depends on the
//! decimal digit count of the machine-code entry address, and that
//! address sits right after the line. The digit count is found by a
//! bounded fixed-point iteration — it stabilizes within two rounds for
//! any 16-bit load address, so hitting the bound is a hard error rather
//! than a reason to keep looping.

#[allow(unused_imports)]
use alloc::format;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::error::PrgError;
use crate::target::TargetConfig;

/// Iteration bound for the digit-count fixed point.
///
/// Two iterations suffice for valid inputs; the headroom guards against
/// future changes to the line-overhead constants.
pub const MAX_FIXPOINT_ITERS: usize = 5;

/// Petscii quote character, used by the `PRINT` literal line.
const QUOTE: u8 = b'"';

/// Byte size of a line before token argument and terminator: next-line
/// pointer (2), line number (2), command token (1).
const LINE_HEADER_LEN: usize = 5;

/// A fully built BASIC program region: one autorun line plus the
/// two-byte program terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicStub {
    bytes: Vec<u8>,
    entry: u16,
}

impl BasicStub {
    /// Build a `SYS <addr>` autorun line, where `<addr>` is the address
    /// of the first byte after the stub.
    ///
    /// # Errors
    ///
    /// [`PrgError::AddressOverflow`] if the entry address leaves the
    /// 16-bit range, [`PrgError::LayoutOverflow`] if the digit count
    /// fails to stabilize within [`MAX_FIXPOINT_ITERS`] rounds.
    pub fn sys(cfg: &TargetConfig) -> Result<Self, PrgError> {
        let separator = usize::from(cfg.space_after_sys);
        // header + separator + line terminator
        let overhead = LINE_HEADER_LEN + separator + 1;

        let mut digits = 1usize;
        for _ in 0..MAX_FIXPOINT_ITERS {
            // + 2 for the program terminator that follows the line.
            let entry = cfg.load_address as u32 + (overhead + digits + 2) as u32;
            if entry > 0xFFFF {
                return Err(PrgError::AddressOverflow { address: entry });
            }
            let stable = decimal_digits(entry);
            if stable == digits {
                return Ok(Self::encode_sys(cfg, entry as u16, overhead + digits));
            }
            digits = stable;
        }
        Err(PrgError::LayoutOverflow {
            load_address: cfg.load_address,
            iterations: MAX_FIXPOINT_ITERS,
        })
    }

    /// Build a `PRINT "<text>"` line — the static payload shape, with no
    /// machine code and no fixed point to solve.
    ///
    /// # Errors
    ///
    /// [`PrgError::AddressOverflow`] if the program runs past the 16-bit
    /// range.
    pub fn print(cfg: &TargetConfig, text: &str) -> Result<Self, PrgError> {
        // header + quote + text + quote + line terminator
        let line_len = LINE_HEADER_LEN + text.len() + 3;
        let end = cfg.load_address as u32 + (line_len + 2) as u32;
        if end > 0xFFFF {
            return Err(PrgError::AddressOverflow { address: end });
        }

        let mut bytes = Vec::with_capacity(line_len + 2);
        let next_line = cfg.load_address + line_len as u16;
        bytes.extend_from_slice(&next_line.to_le_bytes());
        bytes.extend_from_slice(&cfg.line_number.to_le_bytes());
        bytes.push(cfg.print_token);
        bytes.push(QUOTE);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(QUOTE);
        bytes.push(0x00);
        bytes.extend_from_slice(&[0x00, 0x00]);
        Ok(Self {
            bytes,
            entry: end as u16,
        })
    }

    fn encode_sys(cfg: &TargetConfig, entry: u16, line_len: usize) -> Self {
        let mut bytes = Vec::with_capacity(line_len + 2);
        let next_line = cfg.load_address + line_len as u16;
        bytes.extend_from_slice(&next_line.to_le_bytes());
        bytes.extend_from_slice(&cfg.line_number.to_le_bytes());
        bytes.push(cfg.sys_token);
        if cfg.space_after_sys {
            bytes.push(b' ');
        }
        bytes.extend_from_slice(format!("{}", entry).as_bytes());
        bytes.push(0x00);
        bytes.extend_from_slice(&[0x00, 0x00]);
        Self { bytes, entry }
    }

    /// The stub bytes, line and program terminator included.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total stub size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A stub always carries at least the program terminator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Absolute address of the first byte after the stub — the machine
    /// code entry for the `SYS` shape, the program end otherwise.
    #[must_use]
    pub fn entry(&self) -> u16 {
        self.entry
    }
}

/// Number of decimal digits in `n` (1 for 0).
fn decimal_digits(mut n: u32) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
