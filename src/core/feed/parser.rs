use feed_rs::model::Entry;

use super::types::FeedEntry;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("malformed feed: {0}")]
    Malformed(#[from] feed_rs::parser::ParseFeedError),
}

/// Parses an RSS/Atom document into entries, preserving document order.
/// A rejection from the parser means the whole document is unusable and the
/// caller skips the project.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<Vec<FeedEntry>, FeedParseError> {
    let trimmed = trim_leading_ascii_whitespace(raw);
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }
    let feed = feed_rs::parser::parse(trimmed)?;
    Ok(feed.entries.iter().map(entry_from_feed).collect())
}

fn entry_from_feed(entry: &Entry) -> FeedEntry {
    let id = if entry.id.trim().is_empty() {
        entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_else(|| "unknown".to_string())
    } else {
        entry.id.clone()
    };
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .unwrap_or_else(|| "Untitled Entry".to_string());
    let link = entry
        .links
        .first()
        .map(|entry_link| entry_link.href.clone())
        .unwrap_or_default();
    let updated = entry.updated.or(entry.published);

    FeedEntry {
        id,
        title,
        link,
        updated,
    }
}

fn trim_leading_ascii_whitespace(raw: &[u8]) -> &[u8] {
    let mut index = 0;
    while index < raw.len() && raw[index].is_ascii_whitespace() {
        index += 1;
    }
    &raw[index..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_atom_fixture_in_document_order() {
        let xml = include_bytes!("../../../fixtures/release-samples/releases.atom.xml");
        let entries = parse_feed_bytes(xml).expect("atom fixture must parse");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].title, "v1.0.0");
        assert_eq!(entries[1].title, "v1.2.0");
        assert_eq!(entries[2].title, "v1.1.0");
        assert_eq!(
            entries[1].link,
            "https://github.com/acme/widget/releases/tag/v1.2.0"
        );
        assert!(entries.iter().all(|entry| entry.updated.is_some()));
    }

    #[test]
    fn rss_item_without_date_yields_no_timestamp() {
        let xml = include_bytes!("../../../fixtures/release-samples/mixed-dates.rss.xml");
        let entries = parse_feed_bytes(xml).expect("rss fixture must parse");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "rel-10");
        assert!(entries[0].updated.is_some());
        assert_eq!(entries[1].id, "rel-11");
        assert!(entries[1].updated.is_none());
    }

    #[test]
    fn malformed_document_is_rejected() {
        let html = include_bytes!("../../../fixtures/release-samples/not-a-feed.html");
        let result = parse_feed_bytes(html);

        assert!(matches!(result, Err(FeedParseError::Malformed(_))));
    }

    #[test]
    fn empty_payload_is_rejected() {
        let result = parse_feed_bytes(b"   \n ");

        assert!(matches!(result, Err(FeedParseError::EmptyPayload)));
    }
}
