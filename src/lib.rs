//! `yid` turns integer IDs into short, YouTube-style alphanumeric strings and back.
//!
//! Numbers are written in base62 using the symbols `a-z`, `0-9` and `A-Z`, so `12345`
//! becomes `"dnh"`.  The mapping is fully reversible.  Optionally:
//!
//! - a secret key shuffles the alphabet, so the mapping cannot be guessed without the key,
//! - padding guarantees a minimum output length,
//! - a case transform changes how the output is displayed.
//!
//! The shuffled alphabet is derived from the SHA-256 digest of the key in a fixed,
//! documented way, so values encoded by other implementations of the same scheme decode
//! here, and vice versa.
//!
//! Please note that a keyed alphabet is obfuscation, not encryption.  There is no integrity
//! check either: decoding with the wrong key or padding silently gives a different number.
//!
//! # Usage
//!
//! ## Functions
//!
//! ```
//! use yid::Config;
//!
//! let encoded = yid::encode_number(12345, &Config::new()).unwrap();
//! assert_eq!(encoded, "dnh");
//! assert_eq!(yid::decode_string("dnh", &Config::new()).unwrap(), 12345);
//!
//! let config = Config::new().secure_key("my-secret");
//! assert_eq!(yid::encode_number(12345, &config).unwrap(), "hqj");
//! ```
//!
//! ## Reusable `Codec`
//!
//! `Codec` derives the alphabet once and reuses it for every call.
//!
//! ```
//! use yid::{Codec, Config, Transform};
//!
//! let codec = Codec::new(&Config::new().secure_key("my-secret").transform(Transform::Upper));
//! assert_eq!(codec.encode(12345).unwrap(), "HQJ");
//! assert_eq!(codec.encode_raw(12345).unwrap(), "hqj");
//! assert_eq!(codec.decode("hqj").unwrap(), 12345);
//! ```
//!
//! ## Generic `Field` API
//!
//! `Field` wraps an ID so that it is encoded automatically by Serde and stored as a plain
//! `BIGINT` by Diesel.  See [`Field`] for an example.

mod alphabet;
pub mod codec;
mod config;
mod field;
mod transform;

pub use alphabet::{Alphabet, ALPHABET_LEN, CANONICAL};
pub use codec::{Codec, Error};
pub use config::{Config, MAX_PAD_UP};
pub use field::{Field, TypeMarker};
pub use transform::Transform;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encodes a non-negative `number` with the given options.
///
/// The display transform from `config` is applied to the result, so use a config without a
/// transform if the value will be decoded later.
pub fn encode_number(number: i64, config: &Config) -> Result<String, Error> {
    Codec::new(config).encode(number)
}

/// Decodes a string produced by [`encode_number`] back to a number.
///
/// `config` must have the same padding and secure key that were used for encoding.  Its
/// transform setting is ignored: always decode the raw, untransformed value.
pub fn decode_string(text: &str, config: &Config) -> Result<i64, Error> {
    Codec::new(config).decode(text)
}
