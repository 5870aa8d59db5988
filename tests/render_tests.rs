use og_preview::{
    render_all, render_facebook, render_google, render_imessage, MetadataExtractor,
    MetadataRecord, PreviewCard, PLACEHOLDER,
};

type Renderer = fn(&MetadataRecord) -> PreviewCard;

const RENDERERS: [Renderer; 3] = [render_facebook, render_google, render_imessage];

#[test]
fn test_invalid_url_never_breaks_rendering() {
    let record = MetadataRecord {
        title: Some("Still renders".to_string()),
        url: Some("not a valid url".to_string()),
        ..MetadataRecord::default()
    };

    assert_eq!(render_facebook(&record).header, "");
    assert_eq!(render_imessage(&record).header, "");
    // Google shows the raw URL line rather than a hostname.
    assert_eq!(render_google(&record).header, "not a valid url");

    for render in RENDERERS {
        let card = render(&record);
        assert_eq!(card.title, "Still renders");
        assert!(!card.to_string().is_empty());
        assert!(!card.to_html().is_empty());
    }
}

#[test]
fn test_rendering_is_pure() {
    let record = MetadataRecord {
        title: Some("Same".to_string()),
        description: Some("Twice over ".repeat(20)),
        image: Some("/img.png".to_string()),
        url: Some("https://example.com/a".to_string()),
    };

    for render in RENDERERS {
        assert_eq!(render(&record), render(&record));
        assert_eq!(render(&record).to_string(), render(&record).to_string());
    }
    assert_eq!(render_all(&record), render_all(&record));
}

#[test]
fn test_missing_everything() {
    let previews = render_all(&MetadataRecord::default());

    assert_eq!(previews.summary.title, PLACEHOLDER);
    assert_eq!(previews.summary.description, PLACEHOLDER);
    for card in previews.cards() {
        assert!(card.image.is_none());
        assert!(!card.to_html().contains("<img"));
    }
    assert!(previews.to_string().contains("Open Graph Data"));
}

#[test]
fn test_extracted_page_renders_everywhere() {
    let html = r#"<html><head>
        <meta property="og:title" content="日本語のタイトルとても長いタイトルです、本当に長いタイトルです">
        <meta property="og:image" content="https://example.jp/og.png">
        <meta property="og:url" content="https://example.jp/記事">
    </head></html>"#;
    let record = MetadataExtractor::new().extract(html, "https://example.jp");
    let previews = render_all(&record);

    assert_eq!(previews.facebook.header, "EXAMPLE.JP");
    assert!(previews.imessage.title.ends_with("..."));
    assert_eq!(
        previews.facebook.image.as_ref().map(|i| i.alt.as_str()),
        record.title.as_deref()
    );
    assert_eq!(previews.google.description, vec![PLACEHOLDER.to_string()]);
}
