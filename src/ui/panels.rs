use eframe::egui::{self, Color32, RichText, TextureHandle, Ui};

use crate::data::order::SortOrder;
use crate::state::{GalleryState, ViewMode};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Returns `true` when the user asked for a
/// refresh.
pub fn top_bar(ui: &mut Ui, state: &mut GalleryState<TextureHandle>) -> bool {
    let mut refresh = false;

    egui::menu::bar(ui, |ui: &mut Ui| {
        let button = ui.add_enabled(!state.loading, egui::Button::new("⟳ Refresh"));
        if button.clicked() {
            refresh = true;
        }

        ui.separator();

        ui.selectable_value(&mut state.view_mode, ViewMode::List, "List");
        ui.selectable_value(&mut state.view_mode, ViewMode::Grid, "Grid");

        ui.separator();

        for ordering in [SortOrder::ServerOrder, SortOrder::NewestFirst] {
            if ui
                .selectable_label(state.ordering == ordering, ordering.label())
                .clicked()
            {
                state.set_ordering(ordering);
            }
        }

        ui.separator();

        if state.loading {
            ui.spinner();
        } else if !state.listing.is_empty() {
            ui.label(format!("{} images", state.listing.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    refresh
}

// ---------------------------------------------------------------------------
// Central panel placeholder
// ---------------------------------------------------------------------------

/// Shown instead of the views while there is nothing to display.
pub fn empty_gallery(ui: &mut Ui, state: &GalleryState<TextureHandle>) {
    ui.centered_and_justified(|ui: &mut Ui| {
        if state.loading {
            ui.heading("Loading gallery…");
        } else if state.status_message.is_some() {
            ui.heading("The gallery could not be loaded. Press Refresh to try again.");
        } else {
            ui.heading("No images in the gallery.");
        }
    });
}
