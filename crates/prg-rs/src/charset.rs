//! Screen-code character encoding.
//!
//! The C64 video matrix does not hold PETSCII: it holds *screen codes*,
//! a distinct per-character numbering. In the default uppercase set,
//! `'A'`..`'Z'` map to `1`..`26`; digits, punctuation, and space keep
//! their ASCII values.

use alloc::vec::Vec;

/// Encode ASCII text as uppercase-mode screen codes.
///
/// Bytes outside `'A'..='Z'` pass through unchanged.
///
/// # Examples
///
/// ```
/// assert_eq!(prg_rs::charset::encode("AZ!"), vec![1, 26, b'!']);
/// ```
#[must_use]
pub fn encode(text: &str) -> Vec<u8> {
    text.bytes()
        .map(|b| if b.is_ascii_uppercase() { b - b'A' + 1 } else { b })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_alphabet_maps_to_1_through_26() {
        let codes = encode("ABCXYZ");
        assert_eq!(codes, vec![1, 2, 3, 24, 25, 26]);
    }

    #[test]
    fn non_letters_pass_through() {
        assert_eq!(encode(", !"), vec![b',', b' ', b'!']);
        assert_eq!(encode("0159"), vec![b'0', b'1', b'5', b'9']);
    }

    #[test]
    fn empty_input() {
        assert!(encode("").is_empty());
    }

    #[test]
    fn hello_world() {
        assert_eq!(
            encode("HELLO, WORLD!"),
            vec![8, 5, 12, 12, 15, b',', b' ', 23, 15, 18, 12, 4, b'!']
        );
    }
}
