use eframe::egui::{self, ScrollArea, TextureHandle, Ui, Vec2};

use crate::state::GalleryState;
use crate::ui::thumbnail::{ThumbnailRequests, thumbnail_tile};

const COLUMNS: usize = 2;
const SPACING: f32 = 8.0;

// ---------------------------------------------------------------------------
// Grid view: two columns, thumbnail above title
// ---------------------------------------------------------------------------

/// Render the grid presentation.
pub fn grid_view(ui: &mut Ui, state: &mut GalleryState<TextureHandle>, requests: &ThumbnailRequests) {
    let listing = &state.listing;
    let slots = &mut state.thumbnails;
    let indices = &state.visible_indices;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let width = (ui.available_width() / COLUMNS as f32 - 2.0 * SPACING).max(64.0);
            let tile = Vec2::new(width, width * 1.5);

            egui::Grid::new("gallery_grid")
                .num_columns(COLUMNS)
                .spacing([SPACING, SPACING])
                .show(ui, |ui: &mut Ui| {
                    for (n, &index) in indices.iter().enumerate() {
                        let Some(item) = listing.get(index) else {
                            continue;
                        };
                        ui.vertical(|ui: &mut Ui| {
                            ui.set_width(width);
                            thumbnail_tile(
                                ui,
                                slots,
                                requests,
                                index,
                                item.thumbnail_url.as_deref(),
                                tile,
                            );
                            ui.add(egui::Label::new(item.display_title()).truncate());
                        });
                        if (n + 1) % COLUMNS == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
}
