//! Detection of placeholder images announced by a marker comment.
//!
//! A placeholder is a comment such as `<!-- asp: charts/fig1.html -->`
//! followed, with nothing but whitespace in between, by an `<img ...>` tag.

use std::ops::Range;
use std::path::PathBuf;

use regex::Regex;

use crate::error::EmbedError;

/// A marker comment and the image tag it announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte span of the marker comment.
    pub comment: Range<usize>,
    /// Byte span of the image tag.
    pub image: Range<usize>,
    /// Exact text of the image tag.
    pub image_tag: String,
    /// Chart export path as written in the marker, relative to the caller's prefix.
    pub chart_path: PathBuf,
}

/// Finds every placeholder in `html`, in order of appearance.
///
/// `sentinel` is the literal text that opens the comment body (e.g. `asp:`).
pub fn find_placeholders(html: &str, sentinel: &str) -> Result<Vec<Placeholder>, EmbedError> {
    let pattern = format!(
        r"<!--\s*{}(?P<path>[^>\n]*?\.html)\s*-->\s*(?P<img>(?i:<img\b[^>]*>))",
        regex::escape(sentinel)
    );
    let marker = Regex::new(&pattern)?;

    let placeholders = marker
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let path = caps.name("path")?;
            let img = caps.name("img")?;
            let comment_end = html[whole.start()..img.start()]
                .rfind("-->")
                .map(|offset| whole.start() + offset + "-->".len())?;

            Some(Placeholder {
                comment: whole.start()..comment_end,
                image: img.range(),
                image_tag: img.as_str().to_owned(),
                chart_path: PathBuf::from(path.as_str().trim()),
            })
        })
        .collect();

    Ok(placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn finds_marker_followed_by_image() {
        let html = "<section>\n<!-- asp: charts/fig1.html -->\n<img src=\"fig1.png\">\n</section>";
        let found = find_placeholders(html, "asp:").unwrap();

        assert_eq!(found.len(), 1);
        let placeholder = &found[0];
        assert_eq!(placeholder.chart_path, PathBuf::from("charts/fig1.html"));
        assert_eq!(placeholder.image_tag, "<img src=\"fig1.png\">");
        assert_snapshot!(&html[placeholder.comment.clone()], @"<!-- asp: charts/fig1.html -->");
        assert_eq!(&html[placeholder.image.clone()], placeholder.image_tag);
    }

    #[test]
    fn accepts_blank_lines_and_no_space_after_sentinel() {
        let html = "<!--asp:plots/a.html-->\n\n   \t<img alt=\"a\" src=\"a.png\" />";
        let found = find_placeholders(html, "asp:").unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].chart_path, PathBuf::from("plots/a.html"));
        assert_eq!(found[0].image_tag, "<img alt=\"a\" src=\"a.png\" />");
    }

    #[test]
    fn image_tag_stops_at_its_own_closing_bracket() {
        let html = "<!-- asp: a.html --><img src=\"a.png\"><p>caption</p>";
        let found = find_placeholders(html, "asp:").unwrap();
        assert_eq!(found[0].image_tag, "<img src=\"a.png\">");
    }

    #[test]
    fn ignores_markers_not_followed_by_an_image() {
        let html = "<!-- asp: a.html -->\n<p>text</p>\n<img src=\"a.png\">";
        assert!(find_placeholders(html, "asp:").unwrap().is_empty());
    }

    #[test]
    fn ignores_other_comments_and_non_html_targets() {
        let html = "<!-- note: a.html -->\n<img src=\"a.png\">\n<!-- asp: a.png -->\n<img src=\"b.png\">";
        assert!(find_placeholders(html, "asp:").unwrap().is_empty());
    }

    #[test]
    fn keeps_document_order() {
        let html = concat!(
            "<!-- asp: one.html --><img src=\"1.png\">",
            "<p>between</p>",
            "<!-- asp: two.html -->\n<IMG SRC=\"2.png\">",
        );
        let found = find_placeholders(html, "asp:").unwrap();

        let paths: Vec<_> = found.iter().map(|p| p.chart_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("one.html"), PathBuf::from("two.html")]);
        assert_eq!(found[1].image_tag, "<IMG SRC=\"2.png\">");
        assert!(found[0].image.end <= found[1].comment.start);
    }

    #[test]
    fn sentinel_is_matched_literally() {
        let html = "<!-- fig.* charts/a.html --><img src=\"a.png\">";
        assert_eq!(find_placeholders(html, "fig.*").unwrap().len(), 1);
        assert!(find_placeholders("<!-- figXY a.html --><img src=\"a.png\">", "fig.*")
            .unwrap()
            .is_empty());
    }
}
