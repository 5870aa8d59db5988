use crate::MetadataRecord;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

/// Metadata extractor, responsible for turning raw page HTML into a [`MetadataRecord`]
#[derive(Clone, Debug)]
pub struct MetadataExtractor;

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: malformed or empty HTML yields a record whose fields are
    /// all absent, except `url` which falls back to `requested_url`.
    #[instrument(level = "debug", skip(self, html), fields(html_len = html.len()))]
    pub fn extract(&self, html: &str, requested_url: &str) -> MetadataRecord {
        let document = Html::parse_document(html);

        let record = MetadataRecord {
            title: self.extract_title(&document),
            description: self.extract_description(&document),
            image: self.extract_image(&document),
            url: self.extract_url(&document, requested_url),
        };

        debug!(
            title = ?record.title,
            description = ?record.description,
            image = ?record.image,
            url = ?record.url,
            "Metadata extraction finished"
        );
        record
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        // If there is no Open Graph title, fall back to the document title
        meta_content(document, "meta[property='og:title']").or_else(|| {
            let title_selector = Selector::parse("title").ok()?;
            document
                .select(&title_selector)
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|s| !s.is_empty())
        })
    }

    fn extract_description(&self, document: &Html) -> Option<String> {
        meta_content(document, "meta[property='og:description']")
            .or_else(|| meta_content(document, "meta[name='description']"))
    }

    fn extract_image(&self, document: &Html) -> Option<String> {
        meta_content(document, "meta[property='og:image']")
    }

    fn extract_url(&self, document: &Html, requested_url: &str) -> Option<String> {
        meta_content(document, "meta[property='og:url']").or_else(|| {
            let requested = requested_url.trim();
            (!requested.is_empty()).then(|| requested.to_string())
        })
    }
}

/// `content` of the first element matching `selector`; blank values count as absent.
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim_matches(|c: char| c.is_ascii_whitespace()).to_string())
        .filter(|s| !s.is_empty())
}

/// Strips and collapses ASCII whitespace only, as `document.title` does.
/// NBSP and other Unicode spaces are kept.
fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
