/// Strip characters that are not allowed in file names on common
/// filesystems, trim surrounding whitespace and replace the remaining
/// spaces with underscores. Idempotent on already-clean input.
pub fn safe_filename(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    cleaned.trim().replace(' ', "_")
}

/// Capitalize the first letter of every whitespace-separated word and
/// lowercase the rest, rejoining with single spaces.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
