use unicode_normalization::UnicodeNormalization;

/// Image extensions stripped before tokenizing.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Tokenize a photocard filename.
///
/// Returns (tokens, file_extension). Tokens are NFKC-normalized and lowercased
/// so lookups can use lowercase keys. Runs of underscores count as a single
/// separator, so leading/trailing/doubled underscores never produce empty
/// tokens.
pub fn tokenize(input: &str) -> (Vec<String>, Option<String>) {
    let normalized: String = input.trim().nfkc().collect::<String>().to_lowercase();
    let (stem, extension) = strip_extension(&normalized);
    let tokens = stem
        .split('_')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    (tokens, extension.map(|s| s.to_string()))
}

/// Strip one trailing image extension, returning the base name and the
/// extension without its dot.
fn strip_extension(input: &str) -> (&str, Option<&str>) {
    for ext in IMAGE_EXTENSIONS {
        // Guard against multibyte chars near the boundary.
        let split_pos = input.len().wrapping_sub(ext.len());
        if split_pos < input.len() && input.is_char_boundary(split_pos) {
            let suffix = &input[split_pos..];
            if suffix.eq_ignore_ascii_case(ext) {
                return (&input[..split_pos], Some(&ext[1..]));
            }
        }
    }
    (input, None)
}
