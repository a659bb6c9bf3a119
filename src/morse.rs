//! Morse symbols, sequences, and the A-Z alphabet table.

use std::fmt;

/// One Morse unit: a short or long press of the control key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

/// Bit capacity of a packed sequence. Alphabet entries are 1-4 symbols;
/// anything the user accumulates past this can never be a letter anyway.
const MAX_BITS: u8 = 16;

/// A bit-packed Morse sequence.
///
/// Dots are 0-bits and dashes 1-bits, first symbol in the lowest bit, with
/// the length carried alongside so `..` and `..-` stay distinct. Equality is
/// exact and order-sensitive. Pushes past capacity only grow the length, so
/// an overlong accumulator compares unequal to every table entry and decodes
/// as a failure.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    bits: u16,
    len: u8,
}

impl Sequence {
    pub const fn new() -> Self {
        Self { bits: 0, len: 0 }
    }

    /// Build from a dot/dash string, e.g. `".-"` for A.
    pub const fn from_code(code: &str) -> Self {
        let bytes = code.as_bytes();
        let mut bits: u16 = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'-' {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self {
            bits,
            len: bytes.len() as u8,
        }
    }

    /// Append one symbol.
    pub fn push(&mut self, symbol: Symbol) {
        if self.len < MAX_BITS {
            if let Symbol::Dash = symbol {
                self.bits |= 1 << self.len;
            }
        }
        self.len = self.len.saturating_add(1);
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len.min(MAX_BITS) {
            f.write_str(if self.bits & (1 << i) != 0 { "-" } else { "." })?;
        }
        if self.len > MAX_BITS {
            write!(f, "(+{})", self.len - MAX_BITS)?;
        }
        Ok(())
    }
}

/// The 26-letter alphabet. Each sequence maps to exactly one letter; the
/// control meanings of `.` and `..` on a long commit-key release are decided
/// outside this table, by press duration alone.
const ALPHABET: [(Sequence, char); 26] = [
    (Sequence::from_code(".-"), 'A'),
    (Sequence::from_code("-..."), 'B'),
    (Sequence::from_code("-.-."), 'C'),
    (Sequence::from_code("-.."), 'D'),
    (Sequence::from_code("."), 'E'),
    (Sequence::from_code("..-."), 'F'),
    (Sequence::from_code("--."), 'G'),
    (Sequence::from_code("...."), 'H'),
    (Sequence::from_code(".."), 'I'),
    (Sequence::from_code(".---"), 'J'),
    (Sequence::from_code("-.-"), 'K'),
    (Sequence::from_code(".-.."), 'L'),
    (Sequence::from_code("--"), 'M'),
    (Sequence::from_code("-."), 'N'),
    (Sequence::from_code("---"), 'O'),
    (Sequence::from_code(".--."), 'P'),
    (Sequence::from_code("--.-"), 'Q'),
    (Sequence::from_code(".-."), 'R'),
    (Sequence::from_code("..."), 'S'),
    (Sequence::from_code("-"), 'T'),
    (Sequence::from_code("..-"), 'U'),
    (Sequence::from_code("...-"), 'V'),
    (Sequence::from_code(".--"), 'W'),
    (Sequence::from_code("-..-"), 'X'),
    (Sequence::from_code("-.--"), 'Y'),
    (Sequence::from_code("--.."), 'Z'),
];

/// Look up a completed sequence. Exact structural match, no prefix logic.
pub fn decode(seq: Sequence) -> Option<char> {
    ALPHABET
        .iter()
        .find(|(candidate, _)| *candidate == seq)
        .map(|&(_, letter)| letter)
}
