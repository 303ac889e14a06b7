use std::fmt;

use log::{debug, warn};
use sha2::{Digest, Sha256, Sha512};

/// Number of symbols in every alphabet.
pub const ALPHABET_LEN: usize = 62;

/// The canonical ordering: lowercase letters, digits, uppercase letters.
pub const CANONICAL: &[u8; ALPHABET_LEN] =
    b"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// Marks a byte that is not part of the alphabet in the reverse table.
const ABSENT: u8 = u8::MAX;

/// An ordered set of 62 distinct ASCII symbols used as base62 digits.
///
/// An alphabet is either the [canonical](Alphabet::canonical) ordering or a
/// [keyed](Alphabet::derive) permutation of it.  It is immutable once built, and cheap to
/// share between threads.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: [u8; ALPHABET_LEN],
    indices: [u8; 256],
}

impl Alphabet {
    /// Returns the canonical alphabet.
    ///
    /// ```
    /// use yid::Alphabet;
    ///
    /// assert_eq!(
    ///     Alphabet::canonical().as_str(),
    ///     "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ"
    /// );
    /// ```
    pub fn canonical() -> Alphabet {
        Alphabet::from_symbols(*CANONICAL)
    }

    /// Derives a permutation of the canonical alphabet from a secret `key`.
    ///
    /// The lowercase hex form of the key's SHA-256 digest is paired character by character
    /// with the canonical symbols, and the pairs are stably sorted by digest character in
    /// descending order.  The symbols in that order form the keyed alphabet.  The same key
    /// always yields the same alphabet, so values encoded elsewhere with the same key decode
    /// here.
    ///
    /// An empty key is accepted, but callers normally treat it as "no key" and use
    /// [`Alphabet::canonical`] instead.
    ///
    /// ```
    /// use yid::Alphabet;
    ///
    /// let alphabet = Alphabet::derive(b"my-secret");
    /// assert_eq!(
    ///     alphabet.as_str(),
    ///     "eFdhpAHjvx6CIqzrlKRiyVb14fmt25GUcgksBEPWw3JSoDLNOYn0a9MZu78QTX"
    /// );
    /// ```
    pub fn derive(key: &[u8]) -> Alphabet {
        debug!("deriving keyed alphabet from {} byte key", key.len());

        let mut digest = format!("{:x}", Sha256::digest(key));
        if digest.len() < ALPHABET_LEN {
            warn!("sha256 digest too short for alphabet, using sha512");
            digest = format!("{:x}", Sha512::digest(key));
        }

        let mut pairs: Vec<(u8, u8)> = digest
            .bytes()
            .zip(CANONICAL.iter().copied())
            .take(ALPHABET_LEN)
            .collect();
        // `sort_by` is stable, so equal digest characters keep their original order.
        pairs.sort_by(|a, b| b.0.cmp(&a.0));

        let mut symbols = [0u8; ALPHABET_LEN];
        for (slot, (_, symbol)) in symbols.iter_mut().zip(pairs) {
            *slot = symbol;
        }

        let alphabet = Alphabet::from_symbols(symbols);
        assert!(
            alphabet.is_canonical_permutation(),
            "Keyed alphabet should be a permutation"
        );
        alphabet
    }

    fn from_symbols(symbols: [u8; ALPHABET_LEN]) -> Alphabet {
        let mut indices = [ABSENT; 256];
        for (i, &symbol) in symbols.iter().enumerate() {
            indices[symbol as usize] = i as u8;
        }
        Alphabet { symbols, indices }
    }

    /// Returns true if every canonical symbol appears exactly once.
    pub fn is_canonical_permutation(&self) -> bool {
        let mut seen = [false; 256];
        for &symbol in &self.symbols {
            if seen[symbol as usize] {
                return false;
            }
            seen[symbol as usize] = true;
        }
        CANONICAL.iter().all(|&symbol| seen[symbol as usize])
    }

    /// Returns the symbol for digit value `index`.
    ///
    /// Panics if `index` is not below [`ALPHABET_LEN`].
    pub fn symbol(&self, index: usize) -> u8 {
        self.symbols[index]
    }

    /// Returns the digit value of `symbol`, or `None` if it is not in the alphabet.
    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        match self.indices[symbol as usize] {
            ABSENT => None,
            index => Some(index as usize),
        }
    }

    /// Returns the symbols in digit order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }

    /// Returns the symbols in digit order as a string.
    pub fn as_str(&self) -> &str {
        // Only ASCII symbols are ever stored.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::canonical()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Alphabet({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Alphanumeric, Rng};

    #[test]
    fn test_canonical() {
        let alphabet = Alphabet::canonical();
        assert_eq!(alphabet.as_bytes(), CANONICAL);
        assert_eq!(alphabet.symbol(0), b'a');
        assert_eq!(alphabet.symbol(26), b'0');
        assert_eq!(alphabet.symbol(61), b'Z');
        assert_eq!(alphabet.index_of(b'Z'), Some(61));
        assert_eq!(alphabet.index_of(b'!'), None);
        assert_eq!(alphabet.index_of(0xff), None);
        assert!(alphabet.is_canonical_permutation());
    }

    #[test]
    fn test_derive_known_keys() {
        let test_cases = [
            (
                "secret",
                "IKPUo8AJQfls7DCbcjr6TmyzBMYRdq04iESXw35GLg12OVhnptvaHNWZkxFeu9",
            ),
            (
                "key1",
                "qBNs7Vvw48Ouyz6S29CJUk5LMTfgDaiWcjxhmnEHIZdr13AQRXlotFGbpKYe0P",
            ),
            (
                "key2",
                "pCHPRw8Uj2Xalq4JWALDYZkVgs3EThBQSet69FKiuz5OfnoryIdmvxb1GNc07M",
            ),
            (
                "test-key",
                "dlntpyLNDRXux029T7AYcmqHz4BMeor6PUVfiCQSajv8FIOWhk1EK3GJbswg5Z",
            ),
        ];

        for (key, expected) in test_cases {
            assert_eq!(Alphabet::derive(key.as_bytes()).as_str(), expected);
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(Alphabet::derive(b"key1"), Alphabet::derive(b"key1"));
        assert_ne!(Alphabet::derive(b"key1"), Alphabet::derive(b"key2"));
        assert_ne!(Alphabet::derive(b"key1"), Alphabet::canonical());
    }

    #[test]
    fn test_derive_empty_key() {
        let alphabet = Alphabet::derive(b"");
        assert!(alphabet.is_canonical_permutation());
        assert_ne!(alphabet, Alphabet::canonical());
    }

    #[test]
    fn test_random_keys_are_permutations() {
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let length = rng.gen_range(0..64);
            let key: Vec<u8> = (&mut rng).sample_iter(Alphanumeric).take(length).collect();
            let alphabet = Alphabet::derive(&key);

            assert!(alphabet.is_canonical_permutation(), "Key {:?}", key);
            for (i, &symbol) in alphabet.as_bytes().iter().enumerate() {
                assert_eq!(alphabet.index_of(symbol), Some(i));
            }
        }
    }

    #[test]
    fn test_non_ascii_keys() {
        let long_key = "a".repeat(1000);
        for key in ["ключ", "!@#$%^&*()", &long_key] {
            assert!(Alphabet::derive(key.as_bytes()).is_canonical_permutation());
        }
    }

    #[test]
    fn test_display() {
        let alphabet = Alphabet::canonical();
        assert_eq!(alphabet.to_string(), alphabet.as_str());
        assert_eq!(
            format!("{:?}", Alphabet::derive(b"secret")),
            "Alphabet(IKPUo8AJQfls7DCbcjr6TmyzBMYRdq04iESXw35GLg12OVhnptvaHNWZkxFeu9)"
        );
    }
}
