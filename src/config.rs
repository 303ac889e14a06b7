use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use crate::Transform;

static GLOBAL_CONFIG: Lazy<Mutex<Option<Config>>> = Lazy::new(|| Mutex::new(None));

/// The largest supported padding.  `62^(MAX_PAD_UP - 1)` is the largest power of 62 that
/// fits in an `i64`.
pub const MAX_PAD_UP: u8 = 11;

/// Configuring the yid library.
///
/// The configuration can be built in code or deserialized with Serde; missing fields take
/// their default values.
///
/// ```
/// use yid::{Config, Transform};
///
/// let config: Config = serde_json::from_str(r#"{"pad_up": 3, "transform": "upper"}"#).unwrap();
/// assert_eq!(config, Config::new().pad_up(3).transform(Transform::Upper));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub(crate) pad_up: u8,
    pub(crate) secure_key: String,
    pub(crate) transform: Transform,
}

impl Config {
    /// Creates a new configuration with all settings in default values.
    /// - `pad_up` defaults to 0, which means no minimum length.
    /// - `secure_key` defaults to empty, which means the canonical alphabet is used and the
    ///   encoded values are not obfuscated.
    /// - `transform` defaults to [`Transform::None`].
    pub fn new() -> Self {
        Config::default()
    }

    /// Sets the padding used to guarantee a minimum output length of `pad_up` symbols.
    /// Negative values are treated as 0, and values above [`MAX_PAD_UP`] are clamped.
    pub fn pad_up(mut self, pad_up: i32) -> Self {
        self.pad_up = pad_up.clamp(0, MAX_PAD_UP as i32) as u8;
        self
    }

    /// Sets the secret key used to shuffle the alphabet.
    ///
    /// **Security note:** the shuffled alphabet only obfuscates the numbers.  It does not
    /// encrypt them, and it is not a substitute for access control.
    pub fn secure_key(mut self, secure_key: &str) -> Self {
        self.secure_key = secure_key.to_string();
        self
    }

    /// Sets the case transformation applied to encoded output.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the global configuration. This should be called before the `Field` type methods
    /// are called.
    pub fn set_global(config: Config) {
        let mut global_config = GLOBAL_CONFIG.lock().unwrap();
        *global_config = Some(config);
    }

    /// Accesses the global configuration, if set.
    pub fn global() -> Option<Config> {
        GLOBAL_CONFIG.lock().unwrap().clone()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secure_key = if self.secure_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("pad_up", &self.pad_up)
            .field("secure_key", &secure_key)
            .field("transform", &self.transform)
            .finish()
    }
}
