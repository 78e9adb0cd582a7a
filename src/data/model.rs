use chrono::{DateTime, Local};
use serde::Deserialize;

/// Format used for the published date shown under each item.
pub const PUBLISHED_FORMAT: &str = "%d/%m/%y %I:%M %p";

// ---------------------------------------------------------------------------
// GalleryItem – one entry of the listing
// ---------------------------------------------------------------------------

/// One gallery entry as returned by the API.
///
/// Every field is optional: the upstream API omits or nulls any of them, and
/// a record with nothing but an empty object is still a valid item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub title: Option<String>,
    /// Unix epoch seconds.
    #[serde(default, rename = "datetime")]
    pub published_at: Option<i64>,
    #[serde(default, rename = "images_count")]
    pub extra_image_count: Option<i64>,
    #[serde(default, rename = "link")]
    pub thumbnail_url: Option<String>,
}

impl GalleryItem {
    /// Title to render, with a placeholder for untitled entries.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => "Untitled",
        }
    }

    /// Published date in local time, `None` when the API sent no timestamp.
    pub fn published_label(&self) -> Option<String> {
        self.published_at
            .map(|secs| format_timestamp(secs, PUBLISHED_FORMAT))
    }

    pub fn extra_images_label(&self) -> Option<String> {
        self.extra_image_count
            .map(|n| format!("{n} additional images"))
    }
}

/// Format Unix seconds in local time. Timestamps chrono cannot represent
/// yield `"Invalid Timestamp"`.
pub fn format_timestamp(secs: i64, format: &str) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => utc.with_timezone(&Local).format(format).to_string(),
        None => "Invalid Timestamp".to_string(),
    }
}

// ---------------------------------------------------------------------------
// GalleryListing – the decoded response
// ---------------------------------------------------------------------------

/// The full decoded response of one gallery fetch, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GalleryListing {
    #[serde(rename = "data")]
    pub items: Vec<GalleryItem>,
}

impl GalleryListing {
    /// Decode a response body.
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_items_in_server_order() {
        let body = br#"{
            "data": [
                {"title": "A", "datetime": 1704268800, "images_count": 3, "link": "https://i.imgur.com/a.jpg"},
                {"title": "B", "datetime": null, "images_count": null, "link": null},
                {"title": "C"}
            ],
            "success": true,
            "status": 200
        }"#;

        let listing = GalleryListing::from_json(body).unwrap();
        let titles: Vec<_> = listing.items.iter().map(|i| i.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("A"), Some("B"), Some("C")]);
        assert_eq!(listing.items[0].published_at, Some(1704268800));
        assert_eq!(listing.items[0].extra_image_count, Some(3));
        assert_eq!(
            listing.items[0].thumbnail_url.as_deref(),
            Some("https://i.imgur.com/a.jpg")
        );
        assert_eq!(listing.items[2], GalleryItem {
            title: Some("C".into()),
            ..Default::default()
        });
    }

    #[test]
    fn empty_object_is_a_valid_item() {
        let listing = GalleryListing::from_json(br#"{"data": [{}, {}]}"#).unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.items.iter().all(|i| *i == GalleryItem::default()));
    }

    #[test]
    fn rejects_non_array_data() {
        assert!(GalleryListing::from_json(br#"{"data": "not-an-array"}"#).is_err());
        assert!(GalleryListing::from_json(br#"{"items": []}"#).is_err());
        assert!(GalleryListing::from_json(b"<html>").is_err());
    }

    #[test]
    fn rejects_mistyped_field() {
        let err = GalleryListing::from_json(br#"{"data": [{"datetime": "yesterday"}]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn labels_handle_absent_fields() {
        let item = GalleryItem::default();
        assert_eq!(item.display_title(), "Untitled");
        assert_eq!(item.published_label(), None);
        assert_eq!(item.extra_images_label(), None);

        let item = GalleryItem {
            title: Some("Cats".into()),
            extra_image_count: Some(4),
            ..Default::default()
        };
        assert_eq!(item.display_title(), "Cats");
        assert_eq!(item.extra_images_label().as_deref(), Some("4 additional images"));
    }

    #[test]
    fn out_of_range_timestamp_is_reported_not_panicking() {
        assert_eq!(format_timestamp(i64::MAX, PUBLISHED_FORMAT), "Invalid Timestamp");
        let label = format_timestamp(0, "%Y");
        assert!(label == "1970" || label == "1969");
    }
}
