use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback slug for names that reduce to nothing.
pub const UNKNOWN_SLUG: &str = "unknown";

/// Trailing articles moved to the front of artist names, tried in order.
const TRAILING_ARTICLES: [&str; 8] = [
    ", The", ", A", ", An", ", Le", ", La", ", Los", ", Las", ", El",
];

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// A name is usable unless it is blank or made only of `?`.
pub fn is_valid_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !trimmed.chars().all(|c| c == '?')
}

/// Strip any run of leading and trailing `"""` / `"` quote markers.
pub fn strip_quotes(s: &str) -> &str {
    let mut s = s;
    loop {
        if let Some(rest) = s.strip_prefix("\"\"\"") {
            s = rest;
        } else if let Some(rest) = s.strip_prefix('"') {
            s = rest;
        } else {
            break;
        }
    }
    loop {
        if let Some(rest) = s.strip_suffix("\"\"\"") {
            s = rest;
        } else if let Some(rest) = s.strip_suffix('"') {
            s = rest;
        } else {
            break;
        }
    }
    s
}

fn ends_with_ignore_ascii_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Clean an artist name: drop quote markers, then turn `Beatles, The`
/// into `The Beatles`. Only the first matching article is moved.
pub fn sanitize_artist_name(name: &str) -> String {
    let name = strip_quotes(name.trim()).trim();

    for article in TRAILING_ARTICLES {
        if ends_with_ignore_ascii_case(name, article) {
            let base = &name[..name.len() - article.len()];
            return format!("{} {}", &article[2..], base).trim().to_string();
        }
    }
    name.to_string()
}

pub fn sanitize_album_name(name: &str) -> String {
    strip_quotes(name.trim()).trim().to_string()
}

/// URL-safe slug: lowercase, word characters only, hyphen separated.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = SLUG_SEPARATORS.replace_all(&cleaned, "-");
    let slug = hyphenated.trim_matches('-');
    if slug.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
