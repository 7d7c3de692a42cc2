//! Target machine constants.
//!
//! Every ROM routine address, memory base, and BASIC token the generator
//! needs lives in one named configuration set, so the engine can target a
//! different fixed routine layout without code changes.

/// Architecture constants for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetConfig {
    /// Where the target machine places the file body (2-byte file header).
    pub load_address: u16,
    /// ROM clear-screen routine, called on entry.
    pub clear_screen: u16,
    /// ROM keyboard-poll routine (returns 0 while no key is pending).
    pub get_in: u16,
    /// First byte of screen memory; message characters land here.
    pub screen_base: u16,
    /// Interpreter token for the jump-to-machine-code command.
    pub sys_token: u8,
    /// Interpreter token for the print-literal command.
    pub print_token: u8,
    /// Line number of the autorun line.
    pub line_number: u16,
    /// Emit a readability space between the token and its argument.
    pub space_after_sys: bool,
}

impl TargetConfig {
    /// The stock Commodore 64 layout: BASIC start at `$0801`, CLRSCR at
    /// `$E544`, GETIN at `$FFE4`, screen matrix at `$0400`.
    #[must_use]
    pub fn c64() -> Self {
        Self {
            load_address: 0x0801,
            clear_screen: 0xE544,
            get_in: 0xFFE4,
            screen_base: 0x0400,
            sys_token: 0x9E,
            print_token: 0x99,
            line_number: 10,
            space_after_sys: true,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::c64()
    }
}
