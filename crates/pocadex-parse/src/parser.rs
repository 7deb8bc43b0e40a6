pub mod release;
pub mod store;
pub mod version;

use crate::elements::ParsedFilename;
use crate::error::DecodeError;
use crate::keyword::Lexicon;
use crate::tokenizer;

/// Shortest filename that can hold category, album, version/store and member.
pub const MIN_TOKENS: usize = 4;

/// Decode a photocard filename into its catalog metadata.
///
/// # Example
/// ```
/// use pocadex_parse::{decode, Member, ReleaseStructure, Version};
///
/// let card = decode("albums_new_dna_aladin_rakuten_g_ver_standard_hinata.png").unwrap();
/// assert_eq!(card.album_name, "New Dna");
/// assert_eq!(card.store.as_deref(), Some("Aladin Rakuten"));
/// assert_eq!(card.version, Version::GVer);
/// assert_eq!(card.member, Member::Hinata);
/// assert_eq!(card.release_structure, ReleaseStructure::AladinRakuten);
/// ```
pub fn decode(filename: &str) -> Result<ParsedFilename, DecodeError> {
    decode_with(Lexicon::builtin(), filename)
}

/// Decode against an explicit set of dictionaries.
pub fn decode_with(lexicon: &Lexicon, filename: &str) -> Result<ParsedFilename, DecodeError> {
    let (tokens, _extension) = tokenizer::tokenize(filename);
    if tokens.len() < MIN_TOKENS {
        return Err(DecodeError::MalformedInput {
            filename: filename.to_string(),
            parts: tokens.len(),
        });
    }

    // Category from the front.
    let (category, category_end) =
        lexicon
            .category_at_start(&tokens)
            .ok_or_else(|| DecodeError::UnknownCategory {
                filename: filename.to_string(),
                token: tokens[0].clone(),
            })?;

    // Member is always the last token, whatever else it might look like.
    let member_index = tokens.len() - 1;
    let member = lexicon
        .member(&tokens[member_index])
        .ok_or_else(|| DecodeError::UnknownMember {
            filename: filename.to_string(),
            token: tokens[member_index].clone(),
        })?;

    // Version scan runs backward from the member over what the category left.
    let region = &tokens[category_end..member_index];
    let version = version::extract(lexicon, region);

    let middle = &region[..version.start];
    let (album, store) = store::split(lexicon, middle);
    let album_name = title_case(album);
    let store = store.map(title_case);

    let (release_type, release_structure) =
        release::derive(category, &album_name, store.as_deref());

    tracing::debug!(
        filename,
        %category,
        album = %album_name,
        store = store.as_deref().unwrap_or("-"),
        version = %version.version,
        version_rule = version.rule.unwrap_or("default"),
        %member,
        %release_type,
        %release_structure,
        "Decoded filename"
    );

    Ok(ParsedFilename {
        category,
        release_type,
        release_structure,
        album_name,
        store,
        version: version.version,
        member,
    })
}

/// Capitalize the first character of each token and join with spaces.
fn title_case(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| {
            let mut chars = t.chars();
            match chars.next() {
                Some(first) => {
                    // Characters whose upper case expands (`ß` -> `SS`) stay as they are.
                    let mut upper = first.to_uppercase();
                    let head = match (upper.next(), upper.next()) {
                        (Some(u), None) => u,
                        _ => first,
                    };
                    std::iter::once(head).chain(chars).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Category, Member, ReleaseStructure, ReleaseType, Version};

    fn ok(filename: &str) -> ParsedFilename {
        decode(filename).unwrap_or_else(|e| panic!("{filename}: {e}"))
    }

    #[test]
    fn test_basic_album_with_store() {
        let r = ok("albums_awe_amazon_usa_jurin.png");
        assert_eq!(r.category, Category::Albums);
        assert_eq!(r.album_name, "Awe");
        assert_eq!(r.store.as_deref(), Some("Amazon Usa"));
        assert_eq!(r.version, Version::Standard);
        assert_eq!(r.member, Member::Jurin);
        assert_eq!(r.release_type, ReleaseType::Album);
        assert_eq!(r.release_structure, ReleaseStructure::Shops);
    }

    #[test]
    fn test_extension_and_case_insensitive() {
        let expected = ok("albums_awe_amazon_usa_jurin.png");
        for name in [
            "albums_awe_amazon_usa_jurin.jpg",
            "albums_awe_amazon_usa_jurin.jpeg",
            "ALBUMS_AWE_AMAZON_USA_JURIN.PNG",
            "Albums_Awe_Amazon_Usa_Jurin.JpEg",
            "albums_awe_amazon_usa_jurin",
        ] {
            assert_eq!(ok(name), expected, "{name}");
        }
    }

    #[test]
    fn test_g_ver() {
        let r = ok("albums_new_dna_aladin_rakuten_g_ver_standard_hinata.png");
        assert_eq!(r.album_name, "New Dna");
        assert_eq!(r.store.as_deref(), Some("Aladin Rakuten"));
        assert_eq!(r.version, Version::GVer);
        assert_eq!(r.member, Member::Hinata);
        assert_eq!(r.release_type, ReleaseType::Album);
        assert_eq!(r.release_structure, ReleaseStructure::AladinRakuten);
    }

    #[test]
    fn test_g_ver_without_standard() {
        let r = ok("albums_new_dna_hmv_g_ver_juria.png");
        assert_eq!(r.album_name, "New Dna");
        assert_eq!(r.store.as_deref(), Some("Hmv"));
        assert_eq!(r.version, Version::GVer);
    }

    #[test]
    fn test_events_lucky_draw() {
        let r = ok("events_the_first_howl_lucky_draw_r3_standard_maya.png");
        assert_eq!(r.category, Category::Events);
        assert_eq!(r.album_name, "The First Howl");
        assert_eq!(r.store.as_deref(), Some("Lucky Draw"));
        assert_eq!(r.version, Version::R3);
        assert_eq!(r.member, Member::Maya);
        assert_eq!(r.release_type, ReleaseType::LuckyDraw);
        assert_eq!(r.release_structure, ReleaseStructure::LuckyDraw);
    }

    #[test]
    fn test_merch_benefit() {
        let r = ok("merch_anniversary_md_benefit_standard_chisa.png");
        assert_eq!(r.category, Category::Merch);
        assert_eq!(r.album_name, "Anniversary");
        assert_eq!(r.store.as_deref(), Some("Md Benefit"));
        assert_eq!(r.version, Version::Standard);
        assert_eq!(r.member, Member::Chisa);
        assert_eq!(r.release_type, ReleaseType::Anniversary);
        assert_eq!(r.release_structure, ReleaseStructure::UnitPob);
    }

    #[test]
    fn test_fanclub_the_box() {
        let r = ok("fanclub_alphaz_fanclub_the_box_zero_standard_chisa.png");
        assert_eq!(r.category, Category::Fanclub);
        assert_eq!(r.album_name, "Alphaz Fanclub");
        assert_eq!(r.store.as_deref(), Some("The Box"));
        assert_eq!(r.version, Version::Zero);
        assert_eq!(r.member, Member::Chisa);
        assert_eq!(r.release_type, ReleaseType::Fanmeeting);
        assert_eq!(r.release_structure, ReleaseStructure::AnnualMembership);
    }

    #[test]
    fn test_season_greetings() {
        let r = ok("season_greetings_season_greetings_sg_2023_standard_harvey.png");
        assert_eq!(r.category, Category::SeasonGreetings);
        assert_eq!(r.album_name, "Season Greetings");
        assert_eq!(r.store.as_deref(), Some("Sg 2023"));
        assert_eq!(r.version, Version::Standard);
        assert_eq!(r.member, Member::Harvey);
        assert_eq!(r.release_type, ReleaseType::SeasonGreetings);
        assert_eq!(r.release_structure, ReleaseStructure::Shops);
    }

    #[test]
    fn test_showcase_stores() {
        let r = ok("showcase_1st_showcase_merch_benefit_standard_juria.png");
        assert_eq!(r.category, Category::Showcase);
        assert_eq!(r.album_name, "1st Showcase");
        assert_eq!(r.store.as_deref(), Some("Merch Benefit"));
        assert_eq!(r.member, Member::Juria);
        assert_eq!(r.release_type, ReleaseType::Showcase);
        assert_eq!(r.release_structure, ReleaseStructure::UnitPob);

        let r = ok("showcase_1st_showcase_watch_band_benefit_standard_harvey.png");
        assert_eq!(r.album_name, "1st Showcase");
        assert_eq!(r.store.as_deref(), Some("Watch Band Benefit"));
        assert_eq!(r.member, Member::Harvey);
        assert_eq!(r.release_structure, ReleaseStructure::UnitPob);
    }

    #[test]
    fn test_album_card_without_store() {
        let r = ok("albums_awe_standard_cocona.png");
        assert_eq!(r.album_name, "Awe");
        assert_eq!(r.store, None);
        assert_eq!(r.version, Version::Standard);
        assert_eq!(r.member, Member::Cocona);
        assert_eq!(r.release_structure, ReleaseStructure::AlbumCard);
    }

    #[test]
    fn test_revision_without_standard() {
        let r = ok("albums_awe_tower_records_r2_maya.png");
        assert_eq!(r.version, Version::R2);
        assert_eq!(r.member, Member::Maya);
        assert_eq!(r.store.as_deref(), Some("Tower Records"));
        assert_eq!(r.release_structure, ReleaseStructure::TowerRecords);
    }

    #[test]
    fn test_single_word_stores() {
        let r = ok("albums_awe_hmv_standard_jurin.png");
        assert_eq!(r.store.as_deref(), Some("Hmv"));
        assert_eq!(r.release_structure, ReleaseStructure::Hmv);

        let r = ok("albums_awe_ktown4u_standard_jurin.png");
        assert_eq!(r.store.as_deref(), Some("Ktown4u"));
        assert_eq!(r.release_structure, ReleaseStructure::Ktown4u);
    }

    #[test]
    fn test_usa_token_is_not_a_version() {
        let r = ok("albums_awe_amazon_usa_jurin.png");
        assert_eq!(r.version, Version::Standard);
    }

    #[test]
    fn test_too_few_tokens() {
        let err = decode("invalid_format.png").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedInput {
                filename: "invalid_format.png".into(),
                parts: 2,
            }
        );
        assert!(err.to_string().contains("insufficient parts"));
        assert_eq!(decode("").unwrap_err().kind(), "malformed_input");
        assert_eq!(decode("albums___jurin.png").unwrap_err().kind(), "malformed_input");
    }

    #[test]
    fn test_unknown_category() {
        let err = decode("unknown_category_album_store_standard_jurin.png").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownCategory {
                filename: "unknown_category_album_store_standard_jurin.png".into(),
                token: "unknown".into(),
            }
        );
        // `season` alone is not a category.
        assert_eq!(decode("season_awe_hmv_jurin.png").unwrap_err().kind(), "unknown_category");
    }

    #[test]
    fn test_unknown_member() {
        let err = decode("albums_awe_store_standard_unknown.png").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownMember {
                filename: "albums_awe_store_standard_unknown.png".into(),
                token: "unknown".into(),
            }
        );
    }

    #[test]
    fn test_member_position_wins() {
        // Member names elsewhere in the name are just album text.
        let r = ok("albums_maya_hmv_standard_jurin.png");
        assert_eq!(r.album_name, "Maya");
        assert_eq!(r.member, Member::Jurin);

        // A trailing store or version word is never taken as the member.
        assert_eq!(decode("albums_awe_jurin_hmv.png").unwrap_err().kind(), "unknown_member");
        assert_eq!(decode("albums_awe_jurin_standard.png").unwrap_err().kind(), "unknown_member");
    }

    #[test]
    fn test_version_tokens_may_consume_whole_region() {
        let r = ok("albums_g_ver_jurin.png");
        assert_eq!(r.version, Version::GVer);
        assert_eq!(r.album_name, "");
        assert_eq!(r.store, None);
        assert_eq!(r.release_structure, ReleaseStructure::AlbumCard);
    }

    #[test]
    fn test_store_at_segment_start_leaves_empty_album() {
        let r = ok("albums_hmv_standard_jurin.png");
        assert_eq!(r.album_name, "");
        assert_eq!(r.store.as_deref(), Some("Hmv"));
    }

    #[test]
    fn test_category_word_inside_middle_segment() {
        // `merch` is both a category and a store word; position decides.
        let r = ok("merch_pop_up_merch_standard_maya.png");
        assert_eq!(r.category, Category::Merch);
        assert_eq!(r.album_name, "Pop Up");
        assert_eq!(r.store.as_deref(), Some("Merch"));
        assert_eq!(r.release_type, ReleaseType::Showcase);
        assert_eq!(r.release_structure, ReleaseStructure::Shops);
    }

    #[test]
    fn test_idempotent() {
        let name = "events_kcon_la_hmv_r1_harvey.jpg";
        assert_eq!(ok(name), ok(name));
        assert_eq!(ok(name).release_type, ReleaseType::Kcon);
    }

    #[test]
    fn test_derived_fields_depend_only_on_text_fields() {
        // Same (category, album, store) through different versions and members.
        let a = ok("events_the_first_howl_lucky_draw_r3_standard_maya.png");
        let b = ok("events_the_first_howl_lucky_draw_g_ver_cocona.jpg");
        assert_eq!((a.category, &a.album_name, &a.store), (b.category, &b.album_name, &b.store));
        assert_eq!(
            (a.release_type, a.release_structure),
            (b.release_type, b.release_structure)
        );
    }

    #[test]
    fn test_title_case() {
        let toks: Vec<String> = ["1st", "showcase", "ktown4u"].map(String::from).into();
        assert_eq!(title_case(&toks), "1st Showcase Ktown4u");
        assert_eq!(title_case(&[]), "");
    }

    #[test]
    fn test_title_case_keeps_single_char_heads() {
        let toks: Vec<String> = ["ßtraße", "éte"].map(String::from).into();
        assert_eq!(title_case(&toks), "ßtraße Éte");
    }

    #[test]
    fn test_album_starting_with_sharp_s() {
        let r = ok("albums_ßtraße_hmv_standard_maya.png");
        assert_eq!(r.album_name, "ßtraße");
        assert_eq!(r.store.as_deref(), Some("Hmv"));
        assert_eq!(r.member, Member::Maya);
    }
}
