use eframe::egui::{self, Align, Layout, RichText, TextureHandle, Ui, Vec2};
use egui_extras::{Column, TableBuilder};

use crate::state::GalleryState;
use crate::ui::thumbnail::{ThumbnailRequests, thumbnail_tile};

/// Height of one list row.
pub const ROW_HEIGHT: f32 = 180.0;

// ---------------------------------------------------------------------------
// List view: one row per item, thumbnail beside the details
// ---------------------------------------------------------------------------

/// Render the list presentation. Only rows on screen are laid out, so only
/// their thumbnails are requested.
pub fn list_view(
    ui: &mut Ui,
    state: &mut GalleryState<TextureHandle>,
    requests: &ThumbnailRequests,
    thumbnail_size: f32,
) {
    let listing = &state.listing;
    let slots = &mut state.thumbnails;
    let indices = &state.visible_indices;
    let tile = Vec2::splat(thumbnail_size.min(ROW_HEIGHT - 8.0));

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::exact(tile.x + 12.0))
        .column(Column::remainder())
        .body(|body| {
            body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                let index = indices[row.index()];
                let Some(item) = listing.get(index) else {
                    return;
                };

                row.col(|ui| {
                    thumbnail_tile(
                        ui,
                        slots,
                        requests,
                        index,
                        item.thumbnail_url.as_deref(),
                        tile,
                    );
                });
                row.col(|ui| {
                    ui.with_layout(Layout::top_down(Align::Min), |ui| {
                        ui.add_space(8.0);
                        ui.add(egui::Label::new(RichText::new(item.display_title()).strong()).wrap());
                        ui.label(
                            item.published_label()
                                .unwrap_or_else(|| "Date unknown".to_string()),
                        );
                        if let Some(extra) = item.extra_images_label() {
                            ui.label(RichText::new(extra).weak());
                        }
                    });
                });
            });
        });
}
