use serde::Serialize;
use thiserror::Error;

use crate::parser::MIN_TOKENS;

/// Why a filename could not be classified.
///
/// Decoding is deterministic, so none of these are retryable; callers are
/// expected to fall back to manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("malformed filename {filename:?}: insufficient parts ({parts} found, at least {min} required)", min = MIN_TOKENS)]
    MalformedInput { filename: String, parts: usize },

    #[error("unknown category {token:?} in filename {filename:?}")]
    UnknownCategory { filename: String, token: String },

    #[error("unknown member {token:?} in filename {filename:?}")]
    UnknownMember { filename: String, token: String },
}

impl DecodeError {
    /// Stable snake_case tag, matching the serialized `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::UnknownMember { .. } => "unknown_member",
        }
    }
}

/// A string that does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = DecodeError::MalformedInput {
            filename: "invalid_format.png".into(),
            parts: 2,
        };
        assert!(err.to_string().contains("insufficient parts"));
        assert!(err.to_string().contains("at least 4"));

        let err = DecodeError::UnknownCategory {
            filename: "x.png".into(),
            token: "unknown".into(),
        };
        assert!(err.to_string().starts_with("unknown category"));
    }

    #[test]
    fn test_serialized_kind_matches_kind() {
        let err = DecodeError::UnknownMember {
            filename: "albums_awe_store_standard_unknown.png".into(),
            token: "unknown".into(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], err.kind());
        assert_eq!(value["token"], "unknown");
        assert_eq!(value["filename"], "albums_awe_store_standard_unknown.png");
    }
}
