use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use anyhow::{Context, Result};
use eframe::egui::{
    self, Align2, Color32, ColorImage, FontId, Rect, Sense, TextureHandle, Ui, Vec2,
    load::SizedTexture,
};

use crate::app::AppMessage;
use crate::color::placeholder_color;
use crate::data::cache::{CachedBytes, ThumbnailCache};
use crate::data::error::FetchError;
use crate::data::slots::{SlotState, SlotTable, SlotTicket};

/// Threads decoding downloaded thumbnails.
const DECODE_WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Requesting thumbnails for visible cells
// ---------------------------------------------------------------------------

struct DecodeJob {
    ticket: SlotTicket,
    url: String,
    result: Result<CachedBytes, FetchError>,
    ctx: egui::Context,
}

/// Issues thumbnail requests on behalf of the views.
///
/// Each request is tagged with the slot's ticket; downloaded bytes are
/// decoded by a small pool of worker threads and the result travels back
/// over the app channel, where the ticket is checked before anything is
/// shown.
pub struct ThumbnailRequests {
    cache: ThumbnailCache,
    jobs: Sender<DecodeJob>,
}

impl ThumbnailRequests {
    pub fn new(cache: ThumbnailCache, tx: Sender<AppMessage>, max_side: u32) -> Self {
        let (jobs, queue) = mpsc::channel();
        let queue = Arc::new(Mutex::new(queue));
        for _ in 0..DECODE_WORKERS {
            let queue = Arc::clone(&queue);
            let cache = cache.clone();
            let tx = tx.clone();
            thread::spawn(move || decode_worker(&queue, &cache, &tx, max_side));
        }
        Self { cache, jobs }
    }

    /// Start loading `url` into slot `index` unless it is already loading,
    /// loaded, or failed for that URL.
    pub fn ensure(
        &self,
        ctx: &egui::Context,
        slots: &mut SlotTable<TextureHandle>,
        index: usize,
        url: &str,
    ) {
        let Some(ticket) = slots.begin(index, url) else {
            return;
        };

        let jobs = self.jobs.clone();
        let ctx = ctx.clone();
        let key = url.to_string();
        self.cache.request(
            url,
            Box::new(move |result| {
                // Cache hits arrive on the UI thread; keep decoding off it.
                let job = DecodeJob {
                    ticket,
                    url: key,
                    result,
                    ctx,
                };
                if jobs.send(job).is_err() {
                    log::debug!("Decode workers gone; dropping thumbnail {}", ticket.index);
                }
            }),
        );
    }
}

/// Decode jobs until every sender is gone.
fn decode_worker(
    queue: &Mutex<Receiver<DecodeJob>>,
    cache: &ThumbnailCache,
    tx: &Sender<AppMessage>,
    max_side: u32,
) {
    loop {
        let job = match queue.lock().unwrap_or_else(PoisonError::into_inner).recv() {
            Ok(job) => job,
            Err(_) => return,
        };

        let image = match job.result {
            Ok(bytes) => decode_thumbnail(&bytes, max_side).map_err(|e| {
                // Bytes that do not decode must not be served again on retry.
                cache.forget(&job.url);
                format!("{e:#}")
            }),
            Err(e) => Err(e.to_string()),
        };

        let message = AppMessage::ThumbnailDecoded {
            ticket: job.ticket,
            image,
        };
        // A closed receiver means the window is gone.
        if tx.send(message).is_err() {
            return;
        }
        job.ctx.request_repaint();
    }
}

/// Decode image bytes and scale them so the longest side is at most
/// `max_side`, keeping the aspect ratio.
pub fn decode_thumbnail(bytes: &[u8], max_side: u32) -> Result<ColorImage> {
    let img = image::load_from_memory(bytes).context("decoding thumbnail")?;
    let img = if img.width() > max_side || img.height() > max_side {
        img.thumbnail(max_side, max_side)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

// ---------------------------------------------------------------------------
// Drawing a thumbnail tile
// ---------------------------------------------------------------------------

/// Draw the thumbnail for listing position `index` in a tile of `size`,
/// requesting it first if the tile is on screen.
///
/// Items without a URL, and thumbnails that are loading or failed, show a
/// coloured placeholder. Clicking a failed tile retries it.
pub fn thumbnail_tile(
    ui: &mut Ui,
    slots: &mut SlotTable<TextureHandle>,
    requests: &ThumbnailRequests,
    index: usize,
    url: Option<&str>,
    size: Vec2,
) {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    if !ui.is_rect_visible(rect) {
        return;
    }

    if let Some(url) = url {
        requests.ensure(ui.ctx(), slots, index, url);
    }

    if let (Some(_), Some(SlotState::Ready(texture))) = (url, slots.get(index)) {
        egui::Image::from_texture(SizedTexture::from_handle(texture))
            .paint_at(ui, fit_rect(rect, texture.size_vec2()));
        return;
    }

    let failed = match slots.get(index) {
        Some(SlotState::Failed(reason)) => Some(reason.clone()),
        _ => None,
    };
    let caption = match (url, failed) {
        (None, _) => "No image",
        (Some(_), Some(reason)) => {
            if response.on_hover_text(reason).clicked() {
                slots.retry(index);
            }
            "Unavailable"
        }
        (Some(_), None) => "Loading…",
    };

    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, placeholder_color(index));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        caption,
        FontId::proportional(13.0),
        Color32::from_gray(220),
    );
}

/// Largest rect with the aspect ratio of `content` centred inside `outer`.
fn fit_rect(outer: Rect, content: Vec2) -> Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return outer;
    }
    let scale = (outer.width() / content.x).min(outer.height() / content.y);
    Rect::from_center_size(outer.center(), content * scale)
}
