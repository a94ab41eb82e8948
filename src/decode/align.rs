//! Phase alignment search.
//!
//! The bit string carries no framing marker beyond the startup pad,
//! so the codeword boundary is recovered by brute force: try all 12
//! start offsets and keep the one that decodes the most clean
//! codewords.

use super::bitstream::BitString;
use super::hamming::{self, CODEWORD_BITS};

/// Best-effort decode of one segment's bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedDecode {
    /// Characters of the clean codewords at the winning shift.
    pub text: String,
    /// Number of clean codewords at the winning shift.
    pub clean_count: usize,
    /// The winning start offset in bits.
    pub shift: usize,
}

/// Scans all 12 start offsets and returns the decode with the most
/// clean codewords.
///
/// At each shift, consecutive 12-symbol groups are parsed MSB-first
/// and Hamming-decoded; a trailing fragment shorter than one codeword
/// is discarded. Only clean codewords contribute a character and a
/// point toward the score — corrected blocks are decoded but excluded
/// from both, so a shift wins on strictly greater clean count alone
/// (ties keep the earliest shift).
pub fn best_alignment(bits: &BitString) -> AlignedDecode {
    let symbols = bits.as_str().as_bytes();
    let mut best = AlignedDecode {
        text: String::new(),
        clean_count: 0,
        shift: 0,
    };

    for shift in 0..CODEWORD_BITS as usize {
        if shift > symbols.len() {
            break;
        }

        let mut text = String::new();
        let mut clean_count = 0;
        for chunk in symbols[shift..].chunks_exact(CODEWORD_BITS as usize) {
            let codeword = chunk
                .iter()
                .fold(0u16, |acc, &s| acc << 1 | u16::from(s == b'1'));
            let symbol = hamming::decode(codeword);
            if symbol.is_clean() {
                text.push(char::from(symbol.byte));
                clean_count += 1;
            }
        }

        if clean_count > best.clean_count {
            best = AlignedDecode {
                text,
                clean_count,
                shift,
            };
        }
    }

    tracing::debug!(
        shift = best.shift,
        clean = best.clean_count,
        symbols = symbols.len(),
        "alignment selected"
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::hamming::encode;
    use crate::extraction::LedState;

    /// Builds a bit string of pad + `filler` one-bits + the message's
    /// codewords.
    fn synthetic_stream(message: &str, filler: usize) -> BitString {
        let mut bits = BitString::new();
        bits.push_run(LedState::On, filler);
        for byte in message.bytes() {
            let codeword = encode(byte);
            for pos in (0..CODEWORD_BITS).rev() {
                let state = if codeword >> pos & 1 == 1 {
                    LedState::On
                } else {
                    LedState::Off
                };
                bits.push_run(state, 1);
            }
        }
        bits
    }

    #[test]
    fn test_alignment_recovers_message_at_every_shift() {
        for filler in 0..12 {
            let bits = synthetic_stream("HELLO", filler);
            let aligned = best_alignment(&bits);

            assert_eq!(aligned.text, "HELLO", "filler {filler}");
            assert_eq!(aligned.clean_count, 5);
            assert_eq!(aligned.shift, (3 + filler) % 12);
        }
    }

    #[test]
    fn test_pad_only_decodes_empty() {
        let aligned = best_alignment(&BitString::new());

        assert_eq!(aligned.text, "");
        assert_eq!(aligned.clean_count, 0);
        assert_eq!(aligned.shift, 0);
    }

    #[test]
    fn test_trailing_fragment_discarded() {
        let mut bits = synthetic_stream("OK", 0);
        // Seven stray symbols, less than one codeword.
        bits.push_run(LedState::On, 7);

        let aligned = best_alignment(&bits);
        assert_eq!(aligned.text, "OK");
        assert_eq!(aligned.clean_count, 2);
    }

    #[test]
    fn test_corrupted_codeword_still_usable_for_scoring() {
        // Flip one bit inside the second codeword: the block decodes
        // with `corrected` set and is dropped from text and score.
        let bits = synthetic_stream("Hamming", 0);
        let mut symbols: Vec<u8> = bits.as_str().bytes().collect();
        let flip = 3 + 12 + 5; // pad + first codeword + offset into second
        symbols[flip] = if symbols[flip] == b'1' { b'0' } else { b'1' };

        let mut damaged = BitString::new();
        for &s in &symbols[3..] {
            let state = if s == b'1' { LedState::On } else { LedState::Off };
            damaged.push_run(state, 1);
        }

        let aligned = best_alignment(&damaged);
        assert_eq!(aligned.shift, 3);
        assert_eq!(aligned.clean_count, 6);
        assert_eq!(aligned.text, "Hmming");
    }
}
