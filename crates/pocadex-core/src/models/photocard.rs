use chrono::{DateTime, Utc};
use pocadex_parse::{
    Category, DecodeError, Member, ParsedFilename, ReleaseStructure, ReleaseType, Version,
};
use serde::{Deserialize, Serialize};

/// A catalog entry: one photocard design, identified by its source file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photocard {
    pub id: i64,
    pub filename: String,
    pub image_url: String,
    pub category: Category,
    pub release_type: ReleaseType,
    pub release_structure: ReleaseStructure,
    pub album_name: String,
    pub store: Option<String>,
    pub version: Version,
    pub member: Member,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPhotocard {
    pub filename: String,
    pub image_url: String,
    pub category: Category,
    pub release_type: ReleaseType,
    pub release_structure: ReleaseStructure,
    pub album_name: String,
    pub store: Option<String>,
    pub version: Version,
    pub member: Member,
}

impl NewPhotocard {
    pub fn from_decoded(
        filename: impl Into<String>,
        image_url: impl Into<String>,
        parsed: ParsedFilename,
    ) -> Self {
        Self {
            filename: filename.into(),
            image_url: image_url.into(),
            category: parsed.category,
            release_type: parsed.release_type,
            release_structure: parsed.release_structure,
            album_name: parsed.album_name,
            store: parsed.store,
            version: parsed.version,
            member: parsed.member,
        }
    }

    /// Decode `filename` and build the entry from the result.
    pub fn decode(filename: &str, image_url: impl Into<String>) -> Result<Self, DecodeError> {
        let parsed = pocadex_parse::decode(filename)?;
        Ok(Self::from_decoded(filename, image_url, parsed))
    }

    /// Recompute `release_type` and `release_structure` after a manual edit
    /// of category, album or store.
    pub fn rederive(&mut self) {
        let (release_type, release_structure) = pocadex_parse::derive_release(
            self.category,
            &self.album_name,
            self.store.as_deref(),
        );
        self.release_type = release_type;
        self.release_structure = release_structure;
    }
}

/// Catalog search criteria. Every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotocardFilter {
    pub category: Option<Category>,
    pub release_type: Option<ReleaseType>,
    pub release_structure: Option<ReleaseStructure>,
    pub member: Option<Member>,
    pub version: Option<Version>,
    /// Case-insensitive substring of the album name.
    pub album_name: Option<String>,
    /// Case-insensitive substring of the store.
    pub store: Option<String>,
}

impl PhotocardFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
