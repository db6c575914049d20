//! Encoding of two ranked url lists into rank strings over a shared alphabet.

use std::{collections::HashMap, convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::metrics::MetricError;

/// A symbol of a rank string.
///
/// Each distinct url of a comparison is mapped to one symbol, missing results are mapped to
/// [`Symbol::NO_RESULT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(u16);

impl Symbol {
    /// The placeholder of a missing result.
    pub const NO_RESULT: Symbol = Symbol(u16::MAX);

    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn is_no_result(self) -> bool {
        self == Self::NO_RESULT
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_result() {
            write!(f, "_")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The url alphabet of a single comparison.
#[derive(Clone, Debug, Default)]
pub struct RankAlphabet {
    symbols: HashMap<String, Symbol>,
}

impl RankAlphabet {
    /// The number of distinct urls.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbol of an url known to this alphabet.
    pub fn symbol(&self, url: &str) -> Option<Symbol> {
        self.symbols.get(url).copied()
    }

    /// The maximum number of distinct urls, the last id is reserved for [`Symbol::NO_RESULT`].
    pub const CAPACITY: usize = u16::MAX as usize;

    fn encode(&mut self, url: Option<&str>) -> Result<Symbol, MetricError> {
        let url = match url {
            Some(url) => url,
            None => return Ok(Symbol::NO_RESULT),
        };
        if let Some(symbol) = self.symbols.get(url) {
            return Ok(*symbol);
        }

        let symbol = u16::try_from(self.symbols.len())
            .ok()
            .map(Symbol)
            .filter(|symbol| !symbol.is_no_result())
            .ok_or(MetricError::AlphabetExhausted(Self::CAPACITY))?;
        self.symbols.insert(url.to_string(), symbol);

        Ok(symbol)
    }
}

/// Two rank strings of equal length and the alphabet they were encoded with.
#[derive(Clone, Debug)]
pub struct RankPair {
    pub u: Vec<Symbol>,
    pub v: Vec<Symbol>,
    pub alphabet: RankAlphabet,
}

/// Encodes two ranked url lists.
///
/// Symbols are assigned in order of first appearance, first in `left` then in `right`. Both
/// rank strings are padded with [`Symbol::NO_RESULT`] to the length of the longer list, but at
/// least to `depth`.
///
/// # Errors
/// Fails if the lists hold more than [`RankAlphabet::CAPACITY`] distinct urls.
pub fn encode_ranks(
    left: &[Option<&str>],
    right: &[Option<&str>],
    depth: usize,
) -> Result<RankPair, MetricError> {
    let len = depth.max(left.len()).max(right.len());
    let mut alphabet = RankAlphabet::default();

    let mut encode = |urls: &[Option<&str>]| {
        let mut symbols = urls
            .iter()
            .map(|url| alphabet.encode(*url))
            .collect::<Result<Vec<_>, _>>()?;
        symbols.resize(len, Symbol::NO_RESULT);
        Ok::<_, MetricError>(symbols)
    };
    let u = encode(left)?;
    let v = encode(right)?;

    Ok(RankPair { u, v, alphabet })
}

/// Builds a rank string from a sequence of letters, `_` stands for a missing result.
#[cfg(test)]
pub(crate) fn rank_string(letters: &str) -> Vec<Symbol> {
    letters
        .chars()
        .map(|letter| {
            if letter == '_' {
                Symbol::NO_RESULT
            } else {
                Symbol(letter as u16)
            }
        })
        .collect()
}
