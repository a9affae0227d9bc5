//! Pure cleanup helpers applied to compiled rows before they are indexed.

pub mod names;
pub mod values;

pub use names::{
    is_valid_name, sanitize_album_name, sanitize_artist_name, slugify, strip_quotes, UNKNOWN_SLUG,
};
pub use values::{
    format_duration, safe_int, safe_str, sanitize_genre, sanitize_year, sanitize_year_in,
};
