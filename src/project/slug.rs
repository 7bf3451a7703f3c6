use once_cell::sync::Lazy;
use regex::Regex;

/// Slug used when nothing alphanumeric is left.
pub const FALLBACK_SLUG: &str = "record";

/// Lower-case `text` and join its `[a-z0-9]` runs with single hyphens.
pub fn slugify(text: &str) -> String {
    static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
    let lower = text.trim().to_lowercase();
    let slug = NON_ALNUM.replace_all(&lower, "-");
    match slug.trim_matches('-') {
        "" => FALLBACK_SLUG.to_string(),
        s => s.to_string(),
    }
}

/// `<slug>.json`, or `<slug>-<record id>.json` unless the slug already contains the id.
pub fn file_name(slug: &str, record_id: Option<&str>) -> String {
    match record_id {
        Some(id) if !slug.contains(id) => format!("{slug}-{id}.json"),
        _ => format!("{slug}.json"),
    }
}
