use quick_xml::escape::escape;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render a sitemap with one `<url>` per non-empty location, in the given order.
pub fn build_sitemap<I, S>(locations: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        format!(r#"<urlset xmlns="{SITEMAP_NS}">"#),
    ];
    for loc in locations {
        let loc = loc.as_ref();
        if !loc.is_empty() {
            lines.push(format!("  <url><loc>{}</loc></url>", escape(loc)));
        }
    }
    lines.push("</urlset>".to_string());
    lines.join("\n")
}
