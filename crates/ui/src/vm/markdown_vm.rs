use std::collections::{HashMap, HashSet};

/// Render generated summary text as sanitized HTML.
///
/// Summaries are plain prose or light markdown; both come out as paragraphs.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "b", "i", "code", "pre", "blockquote", "ul", "ol", "li", "a",
        "h2", "h3", "h4", "table", "thead", "tbody", "tr", "th", "td", "del",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

/// Rough reading time at 200 words per minute, never below one minute.
#[must_use]
pub fn reading_minutes(text: &str) -> usize {
    text.split_whitespace().count().div_ceil(200).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_emphasis_survive() {
        let html = markdown_to_html("First **point**.\n\nSecond point.");
        assert!(html.contains("<p>First <strong>point</strong>.</p>"), "{html}");
        assert!(html.contains("<p>Second point.</p>"), "{html}");
    }

    #[test]
    fn scripts_are_stripped() {
        let html = markdown_to_html("Hi <script>alert(1)</script>");
        assert!(!html.contains("script"), "{html}");
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_minutes(""), 1);
        assert_eq!(reading_minutes(&"word ".repeat(201)), 2);
    }
}
