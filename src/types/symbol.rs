//! This module defines the canonical alphabet and table types shared by every
//! stage of the codec.

use std::collections::BTreeMap;
use std::fmt;

use bitvec::prelude::*;
use hashbrown::HashMap;

/// One unit of the coding alphabet: a byte value, or the end-of-payload marker.
///
/// The terminator is an out-of-band 257th symbol, so no byte value is reserved.
/// The derived ordering puts every `Byte` before `Terminator`, and bytes in
/// ascending value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Byte(u8),
    Terminator,
}

impl Symbol {
    /// Number of distinct symbols in the alphabet (256 bytes + terminator).
    pub const COUNT: usize = 257;

    /// Dense index of the symbol: 0-255 for bytes, 256 for the terminator.
    pub fn index(self) -> u16 {
        match self {
            Symbol::Byte(b) => b as u16,
            Symbol::Terminator => 256,
        }
    }

    /// Inverse of [`Symbol::index`]. Returns `None` for indices above 256.
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0..=255 => Some(Symbol::Byte(index as u8)),
            256 => Some(Symbol::Terminator),
            _ => None,
        }
    }

    pub fn is_terminator(self) -> bool {
        matches!(self, Symbol::Terminator)
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::Byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}' ({:#04x})", *b as char, b),
            Symbol::Byte(b) => write!(f, "{:#04x}", b),
            Symbol::Terminator => write!(f, "<EOF>"),
        }
    }
}

/// A prefix code: bits in transmission order, most-significant first.
pub type Code = BitVec<u8, Msb0>;

/// Symbol -> code mapping. Ordered so header serialization is reproducible.
pub type CodeTable = BTreeMap<Symbol, Code>;

/// Symbol -> occurrence count for one input.
///
/// Deliberately unordered: tree construction imposes its own tie-break rule and
/// must not depend on how the counts happen to be iterated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<Symbol, u64>,
    /// Number of input bytes scanned to produce the table.
    total_bytes: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for `symbol`, replacing any earlier value.
    pub fn insert(&mut self, symbol: Symbol, count: u64) {
        self.counts.insert(symbol, count);
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub(crate) fn set_total_bytes(&mut self, total: u64) {
        self.total_bytes = total;
    }
}

impl FromIterator<(Symbol, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, u64)>>(iter: I) -> Self {
        let counts: HashMap<Symbol, u64> = iter.into_iter().collect();
        let total_bytes = counts
            .iter()
            .filter(|(s, _)| !s.is_terminator())
            .map(|(_, &c)| c)
            .sum();
        Self {
            counts,
            total_bytes,
        }
    }
}

/// Renders a code as a string of `'0'`/`'1'` characters.
pub fn code_to_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}
