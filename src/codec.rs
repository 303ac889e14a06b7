use std::fmt;

use log::trace;

use crate::{Alphabet, Config, Transform, ALPHABET_LEN, MAX_PAD_UP};

const BASE: i64 = ALPHABET_LEN as i64;

/// Error returned for encode/decode errors.
#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidCharacter { character: char, position: usize },
    NegativeNumber,
    Overflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidCharacter {
                character,
                position,
            } => {
                write!(f, "Invalid character {:?} at position {}", character, position)
            }
            Error::NegativeNumber => {
                write!(f, "Negative numbers are not supported")
            }
            Error::Overflow => {
                write!(f, "Padded number does not fit in 64 bits")
            }
        }
    }
}

impl std::error::Error for Error {}

// 62^exp.  Callers keep `exp` at or below 10, the largest power that fits in an i64.
fn pow(exp: u32) -> i64 {
    BASE.pow(exp)
}

// The value added before encoding and subtracted after decoding.
fn padding_offset(pad_up: u8) -> i64 {
    let pad_up = pad_up.min(MAX_PAD_UP);
    if pad_up > 1 {
        pow(pad_up as u32 - 1)
    } else {
        0
    }
}

/// Encodes a non-negative `number` as a base62 string in the given `alphabet`.
///
/// When `pad_up` is greater than one, `62^(pad_up - 1)` is added to the number first, so
/// the output is at least `pad_up` symbols long.  `pad_up` is capped at [`MAX_PAD_UP`].
///
/// # Examples
///
/// ```
/// use yid::{codec, Alphabet};
///
/// let alphabet = Alphabet::canonical();
/// assert_eq!(codec::encode(12345, &alphabet, 0).unwrap(), "dnh");
/// assert_eq!(codec::encode(1, &alphabet, 3).unwrap(), "bab");
/// ```
pub fn encode(number: i64, alphabet: &Alphabet, pad_up: u8) -> Result<String, Error> {
    if number < 0 {
        return Err(Error::NegativeNumber);
    }
    let mut number = number
        .checked_add(padding_offset(pad_up))
        .ok_or(Error::Overflow)?;

    if number == 0 {
        return Ok((alphabet.symbol(0) as char).to_string());
    }

    // Highest power of 62 that fits in the number.
    let mut t = 0;
    let mut temp = number;
    while temp >= BASE {
        temp /= BASE;
        t += 1;
    }

    let mut result = String::with_capacity(t as usize + 1);
    for exp in (0..=t).rev() {
        let bcp = pow(exp);
        let digit = (number / bcp) % BASE;
        result.push(alphabet.symbol(digit as usize) as char);
        number -= digit * bcp;
    }

    Ok(result)
}

/// Decodes a base62 string produced by [`encode`] with the same `alphabet` and `pad_up`.
///
/// Decoding with a different alphabet or padding does not fail; it just gives a different
/// number.  Inputs longer than 11 symbols wrap around in 64-bit arithmetic.
///
/// # Examples
///
/// ```
/// use yid::{codec, Alphabet, Error};
///
/// let alphabet = Alphabet::canonical();
/// assert_eq!(codec::decode("dnh", &alphabet, 0), Ok(12345));
/// assert_eq!(
///     codec::decode("abc!", &alphabet, 0),
///     Err(Error::InvalidCharacter { character: '!', position: 3 })
/// );
/// ```
pub fn decode(input: &str, alphabet: &Alphabet, pad_up: u8) -> Result<i64, Error> {
    let mut result: i64 = 0;
    let mut multiplier: i64 = 1;

    for (position, &byte) in input.as_bytes().iter().enumerate().rev() {
        let index = match alphabet.index_of(byte) {
            Some(index) => index as i64,
            None => return Err(invalid_character(input, position)),
        };
        result = result.wrapping_add(index.wrapping_mul(multiplier));
        multiplier = multiplier.wrapping_mul(BASE);
    }

    Ok(result.wrapping_sub(padding_offset(pad_up)))
}

// Reports the whole character that contains the offending byte.
fn invalid_character(input: &str, position: usize) -> Error {
    let (position, character) = input
        .char_indices()
        .take_while(|&(i, _)| i <= position)
        .last()
        .unwrap_or((position, char::REPLACEMENT_CHARACTER));
    Error::InvalidCharacter {
        character,
        position,
    }
}

/// Reusable encoder/decoder with preset options.
///
/// The alphabet is built once, when the codec is created, so a `Codec` is the cheap way to
/// encode many values with the same secret key.
#[derive(Clone, Debug)]
pub struct Codec {
    alphabet: Alphabet,
    pad_up: u8,
    transform: Transform,
}

impl Codec {
    /// Creates a new `Codec` from `config`.
    ///
    /// An empty secure key selects the canonical alphabet; any other key selects the
    /// alphabet derived from it.
    ///
    /// # Examples
    ///
    /// ```
    /// use yid::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new().secure_key("my-secret"));
    /// ```
    pub fn new(config: &Config) -> Codec {
        let alphabet = if config.secure_key.is_empty() {
            Alphabet::canonical()
        } else {
            Alphabet::derive(config.secure_key.as_bytes())
        };
        let pad_up = config.pad_up.min(MAX_PAD_UP);
        trace!(
            "created codec (pad_up: {}, keyed: {}, transform: {:?})",
            pad_up,
            !config.secure_key.is_empty(),
            config.transform
        );
        Codec {
            alphabet,
            pad_up,
            transform: config.transform,
        }
    }

    /// Encodes `num` and applies the display transform.
    ///
    /// The transformed value is for display only.  Use [`Codec::encode_raw`] for values that
    /// will be decoded later.
    ///
    /// # Examples
    ///
    /// ```
    /// use yid::{Codec, Config, Transform};
    ///
    /// let config = Config::new()
    ///     .secure_key("my-secret")
    ///     .transform(Transform::Upper);
    /// let codec = Codec::new(&config);
    ///
    /// assert_eq!(codec.encode(12345).unwrap(), "HQJ");
    /// ```
    pub fn encode(&self, num: i64) -> Result<String, Error> {
        let encoded = self.encode_raw(num)?;
        Ok(self.transform.apply(&encoded))
    }

    /// Encodes `num` without the display transform.
    ///
    /// # Examples
    ///
    /// ```
    /// use yid::{Codec, Config, Transform};
    ///
    /// let config = Config::new()
    ///     .secure_key("my-secret")
    ///     .transform(Transform::Upper);
    /// let codec = Codec::new(&config);
    ///
    /// assert_eq!(codec.encode_raw(12345).unwrap(), "hqj");
    /// ```
    pub fn encode_raw(&self, num: i64) -> Result<String, Error> {
        encode(num, &self.alphabet, self.pad_up)
    }

    /// Decodes a raw (untransformed) string back into its original numeric value.
    ///
    /// # Examples
    ///
    /// ```
    /// use yid::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new().secure_key("my-secret"));
    /// let decoded = codec.decode("hqj").unwrap();
    ///
    /// assert_eq!(decoded, 12345);
    /// ```
    pub fn decode(&self, encoded: &str) -> Result<i64, Error> {
        decode(encoded, &self.alphabet, self.pad_up)
    }

    /// The alphabet this codec encodes with.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The padding in effect, already capped at [`MAX_PAD_UP`].
    pub fn pad_up(&self) -> u8 {
        self.pad_up
    }

    /// The display transform applied by [`Codec::encode`].
    pub fn transform(&self) -> Transform {
        self.transform
    }
}
