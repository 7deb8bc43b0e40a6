use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::photocard::Photocard;

/// Physical condition of a collected card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    #[default]
    Mint,
    NearMint,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mint => "Mint",
            Self::NearMint => "Near Mint",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Database string representation (upper case, underscores).
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Mint => "MINT",
            Self::NearMint => "NEAR_MINT",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MINT" => Some(Self::Mint),
            "NEAR_MINT" => Some(Self::NearMint),
            "GOOD" => Some(Self::Good),
            "FAIR" => Some(Self::Fair),
            "POOR" => Some(Self::Poor),
            _ => None,
        }
    }

    pub const ALL: &[Condition] = &[
        Self::Mint,
        Self::NearMint,
        Self::Good,
        Self::Fair,
        Self::Poor,
    ];
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    /// Accepts the database form as well as `near-mint` / `Near Mint`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        Self::from_db_str(&wanted).ok_or_else(|| format!("unknown condition: {s:?}"))
    }
}

/// A card owned by a user, pointing at its catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPhotocard {
    pub id: i64,
    pub user_id: String,
    pub photocard_id: i64,
    /// The user's own photo of the card.
    pub user_image_url: String,
    pub condition: Condition,
    pub acquired_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a card to a user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserPhotocard {
    pub user_id: String,
    pub photocard_id: i64,
    pub user_image_url: String,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub acquired_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewUserPhotocard {
    pub fn new(
        user_id: impl Into<String>,
        photocard_id: i64,
        user_image_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            photocard_id,
            user_image_url: user_image_url.into(),
            condition: Condition::default(),
            acquired_date: None,
            notes: None,
        }
    }
}

/// Partial update of a collection entry.
///
/// `None` leaves a field untouched. For the nullable fields `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPhotocardUpdate {
    pub id: i64,
    pub user_id: String,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub acquired_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

/// A present key, `null` included, becomes `Some`; an absent key stays `None`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl UserPhotocardUpdate {
    pub fn new(id: i64, user_id: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

/// A collection entry joined with its catalog entry for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionRow {
    #[serde(flatten)]
    pub entry: UserPhotocard,
    pub photocard: Photocard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_db_roundtrip() {
        for c in Condition::ALL {
            assert_eq!(Condition::from_db_str(c.as_db_str()), Some(*c));
        }
        assert_eq!(Condition::from_db_str("mint"), None);
    }

    #[test]
    fn test_condition_from_str_is_lenient() {
        assert_eq!("near-mint".parse::<Condition>(), Ok(Condition::NearMint));
        assert_eq!("Near Mint".parse::<Condition>(), Ok(Condition::NearMint));
        assert_eq!(" poor ".parse::<Condition>(), Ok(Condition::Poor));
        assert!("scratched".parse::<Condition>().is_err());
    }

    #[test]
    fn test_condition_defaults_to_mint() {
        let json = r#"{"user_id":"u1","photocard_id":3,"user_image_url":"me.jpg"}"#;
        let input: NewUserPhotocard = serde_json::from_str(json).unwrap();
        assert_eq!(input.condition, Condition::Mint);
        assert!(input.notes.is_none());
        assert_eq!(input, NewUserPhotocard::new("u1", 3, "me.jpg"));
    }

    #[test]
    fn test_update_null_clears_and_absent_keeps() {
        let json = r#"{"id":1,"user_id":"u1","notes":null,"acquired_date":null}"#;
        let update: UserPhotocardUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.acquired_date, Some(None));

        let update: UserPhotocardUpdate = serde_json::from_str(r#"{"id":1,"user_id":"u1"}"#).unwrap();
        assert_eq!(update, UserPhotocardUpdate::new(1, "u1"));

        let json = r#"{"id":1,"user_id":"u1","notes":"signed"}"#;
        let update: UserPhotocardUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.notes, Some(Some("signed".to_string())));
        assert_eq!(update.acquired_date, None);
    }

    #[test]
    fn test_update_serialization_roundtrips_clears() {
        let update = UserPhotocardUpdate {
            notes: Some(None),
            ..UserPhotocardUpdate::new(2, "u1")
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("acquired_date"));
        let back: UserPhotocardUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn test_condition_serializes_as_db_form() {
        assert_eq!(serde_json::to_string(&Condition::NearMint).unwrap(), "\"NEAR_MINT\"");
    }
}
