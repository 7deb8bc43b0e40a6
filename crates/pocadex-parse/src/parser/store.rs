use crate::keyword::Lexicon;

/// Find where the store phrase begins inside the middle segment.
///
/// Two-token phrases are searched first, left to right; only when none
/// occurs anywhere is the segment searched for a single store word.
pub fn find_store_start(lexicon: &Lexicon, middle: &[String]) -> Option<usize> {
    (0..middle.len())
        .find(|&i| lexicon.store_phrase_at(middle, i))
        .or_else(|| middle.iter().position(|t| lexicon.is_store_word(t)))
}

/// Split the middle segment into (album tokens, store tokens).
pub fn split<'a>(lexicon: &Lexicon, middle: &'a [String]) -> (&'a [String], Option<&'a [String]>) {
    match find_store_start(lexicon, middle) {
        Some(start) => (&middle[..start], Some(&middle[start..])),
        None => (middle, None),
    }
}
