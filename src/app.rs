use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::config::GalleryConfig;
use crate::data::cache::ThumbnailCache;
use crate::data::loader::{GalleryLoader, GalleryResult};
use crate::data::slots::SlotTicket;
use crate::state::{GalleryState, ViewMode};
use crate::ui::thumbnail::ThumbnailRequests;
use crate::ui::{grid, list, panels};

/// Results of background work, delivered to the UI thread.
pub enum AppMessage {
    GalleryLoaded(GalleryResult),
    ThumbnailDecoded {
        ticket: SlotTicket,
        image: Result<ColorImage, String>,
    },
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GalleryApp {
    pub state: GalleryState<TextureHandle>,
    config: GalleryConfig,
    loader: GalleryLoader,
    requests: ThumbnailRequests,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    started: bool,
}

impl GalleryApp {
    pub fn new(config: GalleryConfig, loader: GalleryLoader) -> Self {
        let (tx, rx) = mpsc::channel();
        let cache = ThumbnailCache::new(Arc::new(loader.clone()), config.thumbnail_cache_capacity);
        let requests = ThumbnailRequests::new(cache, tx.clone(), config.thumbnail_size);

        Self {
            state: GalleryState::default(),
            config,
            loader,
            requests,
            tx,
            rx,
            started: false,
        }
    }

    /// Issue a gallery request; the result arrives through the channel.
    fn refresh(&mut self, ctx: &egui::Context) {
        self.state.begin_load();

        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.loader
            .fetch_gallery(&self.config.endpoint, &self.config.client_id, move |result| {
                // A closed receiver means the window is gone.
                let _ = tx.send(AppMessage::GalleryLoaded(result));
                ctx.request_repaint();
            });
    }

    /// Apply everything the workers sent since the last frame.
    fn drain_messages(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                AppMessage::GalleryLoaded(result) => self.state.apply_gallery_result(result),
                AppMessage::ThumbnailDecoded { ticket, image } => {
                    if !self.state.thumbnails.is_current(ticket) {
                        log::debug!("Dropping thumbnail for recycled slot {}", ticket.index);
                        continue;
                    }
                    let outcome = image.map(|image| {
                        ctx.load_texture(
                            format!("thumbnail-{}-{}", ticket.index, ticket.version),
                            image,
                            TextureOptions::LINEAR,
                        )
                    });
                    if let Err(reason) = &outcome {
                        log::warn!("Thumbnail {} unavailable: {reason}", ticket.index);
                    }
                    self.state.thumbnails.fulfil(ticket, outcome);
                }
            }
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.refresh(ctx);
        }
        self.drain_messages(ctx);

        // ---- Top panel: toolbar ----
        let mut refresh = false;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            refresh = panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: list or grid ----
        let thumbnail_size = self.config.thumbnail_size as f32;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.listing.is_empty() {
                panels::empty_gallery(ui, &self.state);
                return;
            }
            match self.state.view_mode {
                ViewMode::List => list::list_view(ui, &mut self.state, &self.requests, thumbnail_size),
                ViewMode::Grid => grid::grid_view(ui, &mut self.state, &self.requests),
            }
        });

        if refresh && !self.state.loading {
            self.refresh(ctx);
        }
    }
}
