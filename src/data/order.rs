use std::cmp::Reverse;

use super::model::GalleryListing;

// ---------------------------------------------------------------------------
// View ordering: which listing positions to show, in which order
// ---------------------------------------------------------------------------

/// How the views order the listing. The listing itself is never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// As received from the server.
    #[default]
    ServerOrder,
    /// Newest `published_at` first; items without a timestamp go last.
    NewestFirst,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::ServerOrder => "Trending",
            SortOrder::NewestFirst => "Newest",
        }
    }
}

/// Return listing indices in display order.
///
/// The sort is stable, so items with equal (or missing) timestamps keep
/// their server order.
pub fn ordered_indices(listing: &GalleryListing, ordering: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..listing.len()).collect();
    if ordering == SortOrder::NewestFirst {
        indices.sort_by_key(|&i| {
            let published = listing.items[i].published_at;
            (published.is_none(), Reverse(published))
        });
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GalleryItem;

    fn listing(stamps: &[Option<i64>]) -> GalleryListing {
        GalleryListing {
            items: stamps
                .iter()
                .map(|&published_at| GalleryItem {
                    published_at,
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn server_order_is_identity() {
        let l = listing(&[Some(5), None, Some(9)]);
        assert_eq!(ordered_indices(&l, SortOrder::ServerOrder), vec![0, 1, 2]);
    }

    #[test]
    fn newest_first_puts_missing_timestamps_last() {
        let l = listing(&[Some(5), None, Some(9), Some(5), None]);
        assert_eq!(
            ordered_indices(&l, SortOrder::NewestFirst),
            vec![2, 0, 3, 1, 4]
        );
    }

    #[test]
    fn empty_listing() {
        assert!(ordered_indices(&GalleryListing::default(), SortOrder::NewestFirst).is_empty());
    }
}
