//! # prg-rs — Pure Rust Commodore 64 .PRG Generator
//!
//! `prg-rs` builds loadable C64 programs: a BASIC autorun line followed
//! by hand-assembled 6502 machine code, with all forward references
//! resolved by a classic two-pass layout/patching engine.
//!
//! ## Quick Start
//!
//! ```rust
//! let prg = prg_rs::generate("HELLO, WORLD!").unwrap();
//! // Load-address header: $0801, little-endian.
//! assert_eq!(&prg[..2], &[0x01, 0x08]);
//! ```
//!
//! ## How it works
//!
//! - **Pass 1** ([`CodeEmitter`]): instructions are appended to a
//!   buffer; operands that need a not-yet-known address are written as
//!   placeholders and recorded as [`FixupSite`]s against named labels.
//! - **Layout** ([`BasicStub`]): the autorun line's length depends on
//!   the decimal digit count of the entry address it names — itself a
//!   function of the line's length. A bounded fixed-point iteration
//!   settles it.
//! - **Pass 2** ([`Resolver`]): with the layout fixed, every fixup site
//!   is rewritten — absolute addresses as two little-endian bytes,
//!   branches as range-checked signed displacements.
//! - **Packaging** ([`PrgImage`]): header + stub + code, assembled fully
//!   in memory before any byte reaches disk.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// A code generator lives on narrowing casts between address widths and
// dense hex literals; these lints are expected here.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// BASIC autorun line construction (self-referential length fixed point).
pub mod bootstrap;
/// Screen-code character encoding.
pub mod charset;
/// Append-only code emission: buffer, labels, fixup recording.
pub mod emitter;
/// Error types.
pub mod error;
/// The fixed instruction sequences and the generation pipeline.
pub mod program;
/// Final .PRG packaging and the file sink.
pub mod prg;
/// Second-pass fixup resolution.
pub mod resolver;
/// Target machine constants.
pub mod target;

// Re-exports
pub use bootstrap::{BasicStub, MAX_FIXPOINT_ITERS};
pub use emitter::{CodeEmitter, CodeSection, FixupKind, FixupSite};
pub use error::PrgError;
pub use prg::PrgImage;
pub use program::{Payload, Program};
pub use resolver::Resolver;
pub use target::TargetConfig;

use alloc::string::String;
use alloc::vec::Vec;

/// Generate a stock-C64 print-and-wait-for-key program.
///
/// # Errors
///
/// Returns [`PrgError`] if layout or resolution fails (see
/// [`Program::build`]).
///
/// # Examples
///
/// ```rust
/// let prg = prg_rs::generate("HI").unwrap();
/// // 2-byte header + 13-byte stub + machine code.
/// assert_eq!(prg.len(), 2 + 13 + 31);
/// ```
pub fn generate(message: &str) -> Result<Vec<u8>, PrgError> {
    let payload = Payload::MessageWaitKey {
        message: String::from(message),
    };
    let image = generate_with(TargetConfig::c64(), &payload)?;
    Ok(image.into_bytes())
}

/// Generate with an explicit target configuration and payload shape.
///
/// # Errors
///
/// Returns [`PrgError`] on layout or resolution failure.
///
/// # Examples
///
/// ```rust
/// use prg_rs::{generate_with, Payload, TargetConfig};
///
/// let payload = Payload::PrintLiteral { text: "HI".into() };
/// let image = generate_with(TargetConfig::c64(), &payload)?;
/// assert_eq!(image.load_address(), 0x0801);
/// assert_eq!(image.entry(), None);
/// # Ok::<(), prg_rs::PrgError>(())
/// ```
pub fn generate_with(config: TargetConfig, payload: &Payload) -> Result<PrgImage, PrgError> {
    Program::new(config).build(payload)
}
