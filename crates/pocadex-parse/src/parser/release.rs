use crate::elements::{Category, ReleaseStructure, ReleaseType};

/// Which derived text a release-type rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Album,
    Store,
}

/// Substring rules refining EVENTS and MERCH cards, checked in order.
const EVENT_RULES: &[(Field, &str, ReleaseType)] = &[
    (Field::Album, "anniversary", ReleaseType::Anniversary),
    (Field::Store, "lucky draw", ReleaseType::LuckyDraw),
    (Field::Album, "kcon", ReleaseType::Kcon),
    (Field::Album, "fanmeeting", ReleaseType::Fanmeeting),
];

/// Store substrings mapped to a release structure; first match wins.
const STRUCTURE_RULES: &[(&[&str], ReleaseStructure)] = &[
    (&["tower records"], ReleaseStructure::TowerRecords),
    (&["ktown4u"], ReleaseStructure::Ktown4u),
    (&["hmv"], ReleaseStructure::Hmv),
    (&["aladin", "rakuten"], ReleaseStructure::AladinRakuten),
    (&["broadcast"], ReleaseStructure::Broadcast),
    (&["alphaz", "exclusive"], ReleaseStructure::AlphazExclusive),
    (&["lucky", "draw"], ReleaseStructure::LuckyDraw),
    (&["benefit", "md"], ReleaseStructure::UnitPob),
    (&["fanclub", "the box"], ReleaseStructure::AnnualMembership),
    (&["vip"], ReleaseStructure::VipPhotocard),
];

/// Infer the release type. Only EVENTS and MERCH look at the text fields.
pub fn infer_release_type(category: Category, album_name: &str, store: Option<&str>) -> ReleaseType {
    match category {
        Category::Albums => ReleaseType::Album,
        Category::Fanclub => ReleaseType::Fanmeeting,
        Category::SeasonGreetings => ReleaseType::SeasonGreetings,
        Category::Showcase => ReleaseType::Showcase,
        Category::Events | Category::Merch => {
            let album = album_name.to_lowercase();
            let store = store.map(str::to_lowercase).unwrap_or_default();
            EVENT_RULES
                .iter()
                .find(|(field, needle, _)| match field {
                    Field::Album => album.contains(needle),
                    Field::Store => store.contains(needle),
                })
                .map(|(_, _, release_type)| *release_type)
                .unwrap_or(ReleaseType::Showcase)
        }
    }
}

/// Infer the release structure from the store text. No store means the card
/// came packed in the album itself.
pub fn infer_release_structure(store: Option<&str>) -> ReleaseStructure {
    let Some(store) = store else {
        return ReleaseStructure::AlbumCard;
    };
    let store = store.to_lowercase();
    STRUCTURE_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| store.contains(n)))
        .map(|(_, structure)| *structure)
        .unwrap_or(ReleaseStructure::Shops)
}

/// Both derived fields. A pure function of `(category, album_name, store)`.
pub fn derive(
    category: Category,
    album_name: &str,
    store: Option<&str>,
) -> (ReleaseType, ReleaseStructure) {
    (
        infer_release_type(category, album_name, store),
        infer_release_structure(store),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_categories() {
        assert_eq!(infer_release_type(Category::Albums, "Awe", None), ReleaseType::Album);
        assert_eq!(
            infer_release_type(Category::Fanclub, "Alphaz Fanclub", Some("The Box")),
            ReleaseType::Fanmeeting
        );
        assert_eq!(
            infer_release_type(Category::SeasonGreetings, "Season Greetings", Some("Sg 2023")),
            ReleaseType::SeasonGreetings
        );
        assert_eq!(
            infer_release_type(Category::Showcase, "Anniversary", None),
            ReleaseType::Showcase
        );
    }

    #[test]
    fn test_event_rules_in_order() {
        assert_eq!(
            infer_release_type(Category::Merch, "Anniversary", Some("Md Benefit")),
            ReleaseType::Anniversary
        );
        assert_eq!(
            infer_release_type(Category::Events, "The First Howl", Some("Lucky Draw")),
            ReleaseType::LuckyDraw
        );
        // Album rule outranks the store rule.
        assert_eq!(
            infer_release_type(Category::Events, "2nd Anniversary", Some("Lucky Draw")),
            ReleaseType::Anniversary
        );
        assert_eq!(infer_release_type(Category::Events, "Kcon La", None), ReleaseType::Kcon);
        assert_eq!(
            infer_release_type(Category::Events, "Summer Fanmeeting", Some("Hmv")),
            ReleaseType::Fanmeeting
        );
        assert_eq!(infer_release_type(Category::Merch, "Pop Up", None), ReleaseType::Showcase);
    }

    #[test]
    fn test_structure_table() {
        let cases = [
            (None, ReleaseStructure::AlbumCard),
            (Some("Tower Records"), ReleaseStructure::TowerRecords),
            (Some("Ktown4u"), ReleaseStructure::Ktown4u),
            (Some("Hmv"), ReleaseStructure::Hmv),
            (Some("Aladin Rakuten"), ReleaseStructure::AladinRakuten),
            (Some("Rakuten"), ReleaseStructure::AladinRakuten),
            (Some("Broadcast Benefit"), ReleaseStructure::Broadcast),
            (Some("Alphaz Exclusive"), ReleaseStructure::AlphazExclusive),
            (Some("Lucky Draw"), ReleaseStructure::LuckyDraw),
            (Some("Md Benefit"), ReleaseStructure::UnitPob),
            (Some("Watch Band Benefit"), ReleaseStructure::UnitPob),
            (Some("The Box"), ReleaseStructure::AnnualMembership),
            (Some("Vip Photocard"), ReleaseStructure::VipPhotocard),
            (Some("Amazon Usa"), ReleaseStructure::Shops),
            (Some("Sg 2023"), ReleaseStructure::Shops),
        ];
        for (store, expected) in cases {
            assert_eq!(infer_release_structure(store), expected, "store {store:?}");
        }
    }

    #[test]
    fn test_derive_is_case_insensitive() {
        assert_eq!(
            derive(Category::Events, "THE FIRST HOWL", Some("LUCKY DRAW")),
            derive(Category::Events, "the first howl", Some("lucky draw"))
        );
    }
}
