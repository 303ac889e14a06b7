use serde::{Deserialize, Serialize};

/// Case transformation applied to encoded output for display.
///
/// A transformed string generally no longer decodes to the same number, since the alphabet
/// is case sensitive.  Keep the raw value for storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    #[default]
    None,
    Upper,
    Lower,
}

impl Transform {
    /// Applies the transformation to `value`.
    pub fn apply(self, value: &str) -> String {
        match self {
            Transform::None => value.to_string(),
            Transform::Upper => value.to_ascii_uppercase(),
            Transform::Lower => value.to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(Transform::None.apply("dNh0"), "dNh0");
        assert_eq!(Transform::Upper.apply("dNh0"), "DNH0");
        assert_eq!(Transform::Lower.apply("dNh0"), "dnh0");
    }

    #[test]
    fn test_serde() {
        assert_eq!(Transform::default(), Transform::None);
        assert_eq!(serde_json::to_string(&Transform::Upper).unwrap(), "\"upper\"");
        assert_eq!(
            serde_json::from_str::<Transform>("\"lower\"").unwrap(),
            Transform::Lower
        );
        assert!(serde_json::from_str::<Transform>("\"title\"").is_err());
    }
}
