//! Platform share previews.
//!
//! Each renderer is a pure function of a [`MetadataRecord`]: no shared state,
//! no I/O, and every field of the record may be missing.

use crate::utils::{clamp_lines, parse_hostname, truncate_str};
use crate::MetadataRecord;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::fmt;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Shown in place of a missing title, description or URL.
pub const PLACEHOLDER: &str = "N/A";

const DESCRIPTION_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Facebook,
    Google,
    IMessage,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook Preview",
            Platform::Google => "Google Preview",
            Platform::IMessage => "iMessage Preview",
        }
    }

    /// Card width in pixels on the web page.
    pub fn max_width_px(self) -> u32 {
        match self {
            Platform::Facebook => 500,
            Platform::Google => 600,
            Platform::IMessage => 300,
        }
    }

    /// Card width in terminal columns.
    pub fn columns(self) -> usize {
        match self {
            Platform::Facebook => 60,
            Platform::Google => 72,
            Platform::IMessage => 36,
        }
    }

    fn image_height_px(self) -> Option<u32> {
        match self {
            Platform::Facebook => Some(261),
            Platform::Google => None,
            Platform::IMessage => Some(157),
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Google => "google",
            Platform::IMessage => "imessage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    pub height_px: u32,
}

/// One platform-styled preview, already truncated to the platform's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewCard {
    pub platform: Platform,
    pub image: Option<ImageBlock>,
    /// Hostname (Facebook, iMessage) or full URL (Google).
    pub header: String,
    pub title: String,
    pub description: Vec<String>,
}

/// Host part of `url`, or an empty string when there is none to show.
pub fn hostname_of(url: Option<&str>) -> String {
    let Some(url) = url else {
        return String::new();
    };

    parse_hostname(url).unwrap_or_else(|e| {
        debug!(url = %url, error = %e, "No displayable hostname");
        String::new()
    })
}

pub fn render_facebook(record: &MetadataRecord) -> PreviewCard {
    let header = hostname_of(record.url.as_deref()).to_uppercase();
    build_card(Platform::Facebook, record, header)
}

pub fn render_google(record: &MetadataRecord) -> PreviewCard {
    let header = record.url.as_deref().unwrap_or(PLACEHOLDER).to_string();
    build_card(Platform::Google, record, header)
}

pub fn render_imessage(record: &MetadataRecord) -> PreviewCard {
    let header = hostname_of(record.url.as_deref());
    build_card(Platform::IMessage, record, header)
}

fn build_card(platform: Platform, record: &MetadataRecord, header: String) -> PreviewCard {
    let columns = platform.columns();

    let image = platform.image_height_px().and_then(|height_px| {
        record.image.as_ref().map(|src| ImageBlock {
            src: src.clone(),
            alt: record.title.clone().unwrap_or_default(),
            height_px,
        })
    });

    PreviewCard {
        platform,
        image,
        header: truncate_str(&header, columns),
        title: truncate_str(record.title.as_deref().unwrap_or(PLACEHOLDER), columns),
        description: clamp_lines(
            record.description.as_deref().unwrap_or(PLACEHOLDER),
            columns,
            DESCRIPTION_LINES,
        ),
    }
}

impl PreviewCard {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<section class=\"preview preview-{}\" style=\"max-width:{}px\">\n  <h3>{}</h3>\n",
            self.platform.css_class(),
            self.platform.max_width_px(),
            self.platform.label(),
        );

        if let Some(image) = &self.image {
            html.push_str(&format!(
                "  <img src=\"{}\" alt=\"{}\" style=\"width:100%;height:{}px;object-fit:cover\">\n",
                encode_double_quoted_attribute(&image.src),
                encode_double_quoted_attribute(&image.alt),
                image.height_px,
            ));
        }

        html.push_str(&format!(
            "  <p class=\"header\">{}</p>\n  <h4>{}</h4>\n  <p class=\"description\">{}</p>\n</section>\n",
            encode_text(&self.header),
            encode_text(&self.title),
            encode_text(&self.description.join(" ")),
        ));
        html
    }
}

impl fmt::Display for PreviewCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.platform.columns();
        let mut rows = Vec::new();

        if let Some(image) = &self.image {
            rows.push(truncate_str(&format!("[image] {}", image.src), columns));
        }
        rows.push(self.header.clone());
        rows.push(self.title.clone());
        rows.extend(self.description.iter().cloned());

        write_box(f, self.platform.label(), columns, &rows)
    }
}

/// The "Open Graph Data" panel shown above the platform previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryPanel {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

pub fn render_summary(record: &MetadataRecord) -> SummaryPanel {
    SummaryPanel {
        url: record.url.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        title: record.title.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        description: record
            .description
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        image: record.image.clone(),
    }
}

const SUMMARY_COLUMNS: usize = 72;

impl SummaryPanel {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<section class=\"summary\">\n  <h3>Open Graph Data</h3>\n  <p><strong>URL:</strong> {}</p>\n  <p><strong>Title:</strong> {}</p>\n  <p><strong>Description:</strong> {}</p>\n",
            encode_text(&self.url),
            encode_text(&self.title),
            encode_text(&self.description),
        );
        if let Some(image) = &self.image {
            html.push_str(&format!(
                "  <p><strong>Image:</strong></p>\n  <img src=\"{}\" alt=\"Open Graph\" style=\"max-width:100%\">\n",
                encode_double_quoted_attribute(image),
            ));
        }
        html.push_str("</section>\n");
        html
    }
}

impl fmt::Display for SummaryPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = vec![
            truncate_str(&format!("URL: {}", self.url), SUMMARY_COLUMNS),
            truncate_str(&format!("Title: {}", self.title), SUMMARY_COLUMNS),
            truncate_str(&format!("Description: {}", self.description), SUMMARY_COLUMNS),
        ];
        if let Some(image) = &self.image {
            rows.push(truncate_str(&format!("Image: {image}"), SUMMARY_COLUMNS));
        }
        write_box(f, "Open Graph Data", SUMMARY_COLUMNS, &rows)
    }
}

/// Everything rendered for one record: the tree handed to an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSet {
    pub summary: SummaryPanel,
    pub facebook: PreviewCard,
    pub google: PreviewCard,
    pub imessage: PreviewCard,
}

pub fn render_all(record: &MetadataRecord) -> PreviewSet {
    PreviewSet {
        summary: render_summary(record),
        facebook: render_facebook(record),
        google: render_google(record),
        imessage: render_imessage(record),
    }
}

impl PreviewSet {
    pub fn cards(&self) -> [&PreviewCard; 3] {
        [&self.facebook, &self.google, &self.imessage]
    }

    pub fn to_html(&self) -> String {
        let mut html = self.summary.to_html();
        for card in self.cards() {
            html.push_str(&card.to_html());
        }
        html
    }
}

impl fmt::Display for PreviewSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        for card in self.cards() {
            writeln!(f, "{card}")?;
        }
        Ok(())
    }
}

fn write_box(f: &mut fmt::Formatter<'_>, label: &str, columns: usize, rows: &[String]) -> fmt::Result {
    let label = truncate_str(label, columns.saturating_sub(2));
    let top_fill = "─".repeat(columns.saturating_sub(label.width() + 1));
    writeln!(f, "┌─ {label} {top_fill}┐")?;

    for row in rows {
        let padding = " ".repeat(columns.saturating_sub(row.width()));
        writeln!(f, "│ {row}{padding} │")?;
    }

    write!(f, "└{}┘", "─".repeat(columns + 2))
}
