//! The generated program shapes and the generation pipeline.
//!
//! Two payload shapes exist (the repository's historical variants): a
//! machine-code routine that prints a message into screen memory and
//! waits for a keypress, and a plain BASIC `PRINT` line with no machine
//! code at all. Both run through the same pipeline: build the BASIC
//! stub, emit the code section, resolve fixups, package.

use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;

use crate::bootstrap::BasicStub;
use crate::charset;
use crate::emitter::CodeEmitter;
use crate::error::PrgError;
use crate::prg::PrgImage;
use crate::resolver::Resolver;
use crate::target::TargetConfig;

// 6502 opcodes used by the fixed instruction sequence.
const JSR_ABS: u8 = 0x20;
const LDX_IMM: u8 = 0xA2;
const LDA_ABS_X: u8 = 0xBD;
const BEQ_REL: u8 = 0xF0;
const STA_ABS_X: u8 = 0x9D;
const INX: u8 = 0xE8;
const JMP_ABS: u8 = 0x4C;
const CMP_IMM: u8 = 0xC9;
const RTS: u8 = 0x60;

/// What the generated program does after the autorun line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    /// `SYS` into a machine-code routine: clear the screen, copy the
    /// message into screen memory as screen codes, poll the keyboard
    /// until a key is pressed, return to BASIC.
    MessageWaitKey {
        /// Message text, encoded through [`charset::encode`].
        message: String,
    },
    /// A single static `PRINT "<text>"` line; no machine code.
    PrintLiteral {
        /// Literal text, emitted verbatim between quotes.
        text: String,
    },
}

/// One generation run: a target configuration plus a payload.
#[derive(Debug, Clone)]
pub struct Program {
    config: TargetConfig,
}

impl Program {
    /// Create a generator for the given target.
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    /// The active target configuration.
    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Build the complete loadable image for `payload`.
    ///
    /// # Errors
    ///
    /// Any [`PrgError`] raised during stub construction or fixup
    /// resolution; on error no output is produced.
    pub fn build(&self, payload: &Payload) -> Result<PrgImage, PrgError> {
        match payload {
            Payload::PrintLiteral { text } => {
                let stub = BasicStub::print(&self.config, text)?;
                Ok(PrgImage::assemble(
                    self.config.load_address,
                    stub.bytes(),
                    &[],
                    None,
                ))
            }
            Payload::MessageWaitKey { message } => {
                let stub = BasicStub::sys(&self.config)?;
                let mut emitter = CodeEmitter::new();
                self.emit_message_routine(&mut emitter, message)?;
                let resolver = Resolver::new(self.config.load_address, stub.len())?;
                debug_assert_eq!(resolver.base(), stub.entry());
                let code = resolver.resolve(emitter.finish())?;
                Ok(PrgImage::assemble(
                    self.config.load_address,
                    stub.bytes(),
                    &code,
                    Some(stub.entry()),
                ))
            }
        }
    }

    /// Emit the fixed print-and-wait instruction sequence.
    ///
    /// Layout: copy loop reading `message,X` until the zero terminator,
    /// storing to `screen_base,X`; then a jump over the inline message
    /// bytes to the wait-key poll.
    fn emit_message_routine(
        &self,
        emitter: &mut CodeEmitter,
        message: &str,
    ) -> Result<(), PrgError> {
        let cfg = &self.config;

        emitter.emit_byte(JSR_ABS);
        emitter.emit(&cfg.clear_screen.to_le_bytes());
        emitter.emit(&[LDX_IMM, 0x00]);

        emitter.mark_label("loop")?;
        emitter.emit_byte(LDA_ABS_X);
        emitter.reserve_absolute("message");
        emitter.emit_byte(BEQ_REL);
        emitter.reserve_branch("done")?;
        emitter.emit_byte(STA_ABS_X);
        emitter.emit(&cfg.screen_base.to_le_bytes());
        emitter.emit_byte(INX);
        emitter.emit_byte(JMP_ABS);
        emitter.reserve_absolute("loop");

        emitter.mark_label("done")?;
        emitter.emit_byte(JMP_ABS);
        emitter.reserve_absolute("waitkey");

        emitter.mark_label("message")?;
        emitter.emit(&charset::encode(message));
        emitter.emit_byte(0x00);

        emitter.mark_label("waitkey")?;
        emitter.emit_byte(JSR_ABS);
        emitter.emit(&cfg.get_in.to_le_bytes());
        emitter.emit(&[CMP_IMM, 0x00]);
        emitter.emit_byte(BEQ_REL);
        emitter.reserve_branch("waitkey")?;
        emitter.emit_byte(RTS);
        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(TargetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build just the code section (unresolved) for inspection.
    fn emit_section(message: &str) -> crate::emitter::CodeSection {
        let program = Program::default();
        let mut emitter = CodeEmitter::new();
        program.emit_message_routine(&mut emitter, message).unwrap();
        emitter.finish()
    }

    #[test]
    fn routine_label_offsets() {
        let section = emit_section("HELLO, WORLD!");
        assert_eq!(section.label_offset("loop"), Some(5));
        assert_eq!(section.label_offset("done"), Some(17));
        assert_eq!(section.label_offset("message"), Some(20));
        // 13 message bytes + terminator.
        assert_eq!(section.label_offset("waitkey"), Some(34));
        assert_eq!(section.len(), 42);
    }

    #[test]
    fn routine_starts_with_clear_screen_call() {
        let section = emit_section("HI");
        assert_eq!(&section.bytes()[..5], &[0x20, 0x44, 0xE5, 0xA2, 0x00]);
    }

    #[test]
    fn waitkey_branch_is_resolved_at_emission() {
        let section = emit_section("HI");
        // Only forward/absolute fixups remain: message lo/hi, done branch,
        // loop lo/hi, waitkey lo/hi.
        assert_eq!(section.fixups().len(), 7);
        // BEQ back to waitkey: operand is second-to-last byte, target is
        // 7 bytes before the following RTS.
        let bytes = section.bytes();
        assert_eq!(bytes[bytes.len() - 2], 0xF9);
        assert_eq!(bytes[bytes.len() - 1], RTS);
    }

    #[test]
    fn empty_message_keeps_terminator() {
        let section = emit_section("");
        let msg = section.label_offset("message").unwrap();
        let waitkey = section.label_offset("waitkey").unwrap();
        // Message region is the lone terminator byte.
        assert_eq!(waitkey, msg + 1);
        assert_eq!(section.bytes()[msg], 0x00);
    }
}
