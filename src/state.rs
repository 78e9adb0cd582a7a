use crate::data::error::FetchError;
use crate::data::loader::GalleryResult;
use crate::data::model::GalleryListing;
use crate::data::order::{SortOrder, ordered_indices};
use crate::data::slots::SlotTable;

/// Which presentation is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Owned by the app and mutated only on the UI thread; background work
/// reaches it through [`apply_gallery_result`](Self::apply_gallery_result)
/// and `thumbnails.fulfil`. `T` is the rendered thumbnail type.
pub struct GalleryState<T> {
    /// Current listing (empty until the first successful load).
    pub listing: GalleryListing,

    pub view_mode: ViewMode,

    pub ordering: SortOrder,

    /// Listing indices in display order (cached).
    pub visible_indices: Vec<usize>,

    /// One thumbnail slot per listing position.
    pub thumbnails: SlotTable<T>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a gallery request is in flight.
    pub loading: bool,
}

impl<T> Default for GalleryState<T> {
    fn default() -> Self {
        Self {
            listing: GalleryListing::default(),
            view_mode: ViewMode::default(),
            ordering: SortOrder::default(),
            visible_indices: Vec::new(),
            thumbnails: SlotTable::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl<T> GalleryState<T> {
    /// Record that a gallery request was issued.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.status_message = None;
    }

    /// The single update path for gallery results.
    ///
    /// A failure leaves the current listing (and its thumbnails) in place.
    pub fn apply_gallery_result(&mut self, result: GalleryResult) {
        self.loading = false;
        match result {
            Ok(listing) => self.set_listing(listing),
            Err(e) => {
                log::error!("Failed to load gallery: {e}");
                self.status_message = Some(failure_message(&e));
            }
        }
    }

    /// Replace the listing wholesale. Thumbnail slots start over, so results
    /// still in flight for the old listing are discarded on arrival.
    pub fn set_listing(&mut self, listing: GalleryListing) {
        self.thumbnails.reset(listing.len());
        self.visible_indices = ordered_indices(&listing, self.ordering);
        self.listing = listing;
        self.status_message = None;
    }

    pub fn set_ordering(&mut self, ordering: SortOrder) {
        self.ordering = ordering;
        self.visible_indices = ordered_indices(&self.listing, ordering);
    }
}

/// User-facing text for a failed gallery load.
pub fn failure_message(err: &FetchError) -> String {
    match (err, err.status()) {
        (_, Some(401 | 403)) => "Error: the server rejected the client ID".to_string(),
        (_, Some(code)) => format!("Error: the gallery answered with HTTP {code}"),
        (FetchError::Transport { .. }, None) => {
            format!("Error: could not reach the gallery ({err})")
        }
        (FetchError::Decode(_), _) => format!("Error: unexpected gallery response ({err})"),
        (FetchError::InvalidInput { .. }, _) => format!("Error: {err}"),
    }
}
