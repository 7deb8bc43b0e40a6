use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Declares a closed enumeration with a canonical upper-case wire name per
/// variant. The wire name is used for serde, `Display`, `FromStr` and the
/// database columns.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Canonical name, e.g. `"SEASON_GREETINGS"`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            /// Case-insensitive; `-` and spaces are accepted in place of `_`.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().replace(['-', ' '], "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| UnknownVariant {
                        kind: $label,
                        value: s.to_string(),
                    })
            }
        }
    };
}

closed_enum! {
    /// Top-level grouping a card was filed under; always the leading token(s).
    pub enum Category ("category") {
        Albums => "ALBUMS",
        Events => "EVENTS",
        Merch => "MERCH",
        Fanclub => "FANCLUB",
        SeasonGreetings => "SEASON_GREETINGS",
        Showcase => "SHOWCASE",
    }
}

closed_enum! {
    /// The release event or context a card originated from.
    pub enum ReleaseType ("release type") {
        Album => "ALBUM",
        Anniversary => "ANNIVERSARY",
        Showcase => "SHOWCASE",
        Kcon => "KCON",
        Weverse => "WEVERSE",
        Fanmeeting => "FANMEETING",
        LuckyDraw => "LUCKY_DRAW",
        SeasonGreetings => "SEASON_GREETINGS",
        Photocard => "PHOTOCARD",
        Postcard => "POSTCARD",
    }
}

closed_enum! {
    /// Distribution channel through which a card was obtained.
    pub enum ReleaseStructure ("release structure") {
        TowerRecords => "TOWER_RECORDS",
        Ktown4u => "KTOWN4U",
        Hmv => "HMV",
        AladinRakuten => "ALADIN_RAKUTEN",
        Broadcast => "BROADCAST",
        AlphazExclusive => "ALPHAZ_EXCLUSIVE",
        LuckyDraw => "LUCKY_DRAW",
        Shops => "SHOPS",
        AlbumCard => "ALBUM_CARD",
        UnitPob => "UNIT_POB",
        VipPhotocard => "VIP_PHOTOCARD",
        AnnualMembership => "ANNUAL_MEMBERSHIP",
    }
}

closed_enum! {
    pub enum Member ("member") {
        Jurin => "JURIN",
        Chisa => "CHISA",
        Hinata => "HINATA",
        Harvey => "HARVEY",
        Juria => "JURIA",
        Maya => "MAYA",
        Cocona => "COCONA",
    }
}

closed_enum! {
    /// Card version printed on the back of the card.
    pub enum Version ("version") {
        Standard => "STANDARD",
        GVer => "G_VER",
        R1 => "R1",
        R2 => "R2",
        R3 => "R3",
        Zero => "ZERO",
        /// Accepted on input and in storage; never inferred from a filename.
        Usa => "USA",
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::Standard
    }
}

/// Metadata recovered from a photocard filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFilename {
    pub category: Category,
    pub release_type: ReleaseType,
    pub release_structure: ReleaseStructure,
    /// Title-cased, space-joined. Empty when the store phrase opens the middle segment.
    pub album_name: String,
    /// Title-cased store phrase; `None` for plain album cards.
    pub store: Option<String>,
    pub version: Version,
    pub member: Member,
}
