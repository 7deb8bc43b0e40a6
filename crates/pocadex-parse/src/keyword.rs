use phf::{phf_map, phf_set};

use crate::elements::{Category, Member, Version};

/// Compile-time category lookup for single-token categories.
/// All keys are lowercase; callers lowercase tokens before lookup.
pub static CATEGORIES: phf::Map<&'static str, Category> = phf_map! {
    "albums" => Category::Albums,
    "events" => Category::Events,
    "merch" => Category::Merch,
    "fanclub" => Category::Fanclub,
    "showcase" => Category::Showcase,
};

/// Categories spelled with two leading tokens. Checked before `CATEGORIES`.
pub static CATEGORY_PHRASES: &[([&str; 2], Category)] =
    &[(["season", "greetings"], Category::SeasonGreetings)];

pub static MEMBERS: phf::Map<&'static str, Member> = phf_map! {
    "jurin" => Member::Jurin,
    "chisa" => Member::Chisa,
    "hinata" => Member::Hinata,
    "harvey" => Member::Harvey,
    "juria" => Member::Juria,
    "maya" => Member::Maya,
    "cocona" => Member::Cocona,
};

/// Version tokens that may stand alone or precede `standard`.
pub static REVISIONS: phf::Map<&'static str, Version> = phf_map! {
    "r1" => Version::R1,
    "r2" => Version::R2,
    "r3" => Version::R3,
    "zero" => Version::Zero,
};

pub const STANDARD: &str = "standard";
pub const G_VER: [&str; 2] = ["g", "ver"];

/// Two-token store phrases, in priority order.
pub static STORE_PHRASES: &[[&str; 2]] = &[
    ["tower", "records"],
    ["aladin", "rakuten"],
    ["amazon", "usa"],
    ["lucky", "draw"],
    ["md", "benefit"],
    ["merch", "benefit"],
    ["watch", "band"],
    ["the", "box"],
    ["alphaz", "exclusive"],
    ["fanclub", "benefit"],
    ["broadcast", "benefit"],
    ["vip", "photocard"],
    ["soundwave", "usa"],
    ["target", "usa"],
];

/// Single tokens that open a store phrase when no two-token phrase is present.
pub static STORE_WORDS: phf::Set<&'static str> = phf_set! {
    "hmv",
    "ktown4u",
    "amazon",
    "aladin",
    "rakuten",
    "tower",
    "broadcast",
    "weverse",
    "shops",
    "merch",
    "fanclub",
    "benefit",
    "md",
    "sg",
    "vip",
    "alphaz",
    "soundwave",
    "target",
    "yes24",
    "applemusic",
    "makestar",
    "withmuu",
    "everline",
    "lucky",
};

/// The dictionaries [`crate::decode`] uses.
pub static BUILTIN: Lexicon = Lexicon {
    categories: &CATEGORIES,
    category_phrases: CATEGORY_PHRASES,
    members: &MEMBERS,
    revisions: &REVISIONS,
    store_phrases: STORE_PHRASES,
    store_words: &STORE_WORDS,
};

/// Read-only bundle of the dictionaries the decoder consults.
///
/// Callers with their own tables can build another one from `'static` data
/// and pass it to [`crate::parser::decode_with`].
#[derive(Clone, Copy)]
pub struct Lexicon {
    pub categories: &'static phf::Map<&'static str, Category>,
    pub category_phrases: &'static [([&'static str; 2], Category)],
    pub members: &'static phf::Map<&'static str, Member>,
    pub revisions: &'static phf::Map<&'static str, Version>,
    pub store_phrases: &'static [[&'static str; 2]],
    pub store_words: &'static phf::Set<&'static str>,
}

impl Lexicon {
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Match a category at the start of `tokens`, returning it with the
    /// number of tokens it occupies.
    pub fn category_at_start(&self, tokens: &[String]) -> Option<(Category, usize)> {
        for (phrase, category) in self.category_phrases {
            if tokens.len() >= 2 && tokens[0] == phrase[0] && tokens[1] == phrase[1] {
                return Some((*category, 2));
            }
        }
        let first = tokens.first()?;
        self.categories.get(first.as_str()).map(|c| (*c, 1))
    }

    pub fn member(&self, token: &str) -> Option<Member> {
        self.members.get(token).copied()
    }

    pub fn revision(&self, token: &str) -> Option<Version> {
        self.revisions.get(token).copied()
    }

    /// Whether a known two-token store phrase starts at `tokens[i]`.
    pub fn store_phrase_at(&self, tokens: &[String], i: usize) -> bool {
        if i + 1 >= tokens.len() {
            return false;
        }
        self.store_phrases
            .iter()
            .any(|[a, b]| tokens[i] == *a && tokens[i + 1] == *b)
    }

    pub fn is_store_word(&self, token: &str) -> bool {
        self.store_words.contains(token)
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("categories", &self.categories.len())
            .field("members", &self.members.len())
            .field("store_phrases", &self.store_phrases.len())
            .field("store_words", &self.store_words.len())
            .finish()
    }
}
