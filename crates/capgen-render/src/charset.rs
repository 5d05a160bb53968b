// this_file: crates/capgen-render/src/charset.rs

//! Label alphabets and random label text.

use capgen_core::{CaptchaError, Result};
use rand::Rng;

/// Lowercase letters, digits, uppercase letters, in class-id order.
pub const DEFAULT_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ordered set of distinct symbols; a symbol's position is its class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<char>,
}

impl Default for Charset {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

impl Charset {
    /// Build from `symbols`, rejecting empty input and duplicates.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(CaptchaError::configuration("charset is empty"));
        }
        for (i, ch) in symbols.iter().enumerate() {
            if symbols[..i].contains(ch) {
                return Err(CaptchaError::configuration(format!(
                    "charset lists {ch:?} more than once"
                )));
            }
        }
        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, ch: char) -> bool {
        self.symbols.contains(&ch)
    }

    pub fn index_of(&self, ch: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == ch)
    }

    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Class ids for every character of `text`.
    pub fn encode(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .map(|ch| {
                self.index_of(ch).ok_or_else(|| {
                    CaptchaError::invalid_input(format!("{ch:?} is not in the charset"))
                })
            })
            .collect()
    }

    /// `len` symbols drawn uniformly with replacement.
    pub fn random_text<R: Rng + ?Sized>(&self, rng: &mut R, len: usize) -> String {
        (0..len)
            .map(|_| self.symbols[rng.gen_range(0..self.symbols.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_alphabet_order() {
        let charset = Charset::default();
        assert_eq!(charset.len(), 62);
        assert_eq!(charset.index_of('a'), Some(0));
        assert_eq!(charset.index_of('0'), Some(26));
        assert_eq!(charset.index_of('A'), Some(36));
        assert_eq!(charset.symbol(61), Some('Z'));
        assert_eq!(charset.symbol(62), None);
        assert_eq!(charset.index_of('-'), None);
    }

    #[test]
    fn encode_maps_to_class_ids() {
        let charset = Charset::default();
        assert_eq!(charset.encode("a0Z").unwrap(), vec![0, 26, 61]);
        assert!(charset.encode("a b").is_err());
    }

    #[test]
    fn random_text_uses_only_charset_symbols() {
        let charset = Charset::new("xyz").unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let text = charset.random_text(&mut rng, 50);
        assert_eq!(text.chars().count(), 50);
        assert!(text.chars().all(|ch| charset.contains(ch)));
        assert_eq!(charset.random_text(&mut rng, 0), "");
    }

    #[test]
    fn rejects_empty_and_duplicate_symbols() {
        assert!(Charset::new("").is_err());
        assert!(Charset::new("abca").is_err());
    }
}
