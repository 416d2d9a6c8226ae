use eframe::egui::{
    ColorImage, Pos2, Rect, Response, Sense, TextureHandle, TextureOptions, Ui, Widget, pos2, vec2,
};
use eframe::epaint::Color32;

use std::borrow::Cow;

use crate::colormap::Palette;
use crate::range::DisplayRange;

pub const DEFAULT_HISTORY_ROWS: usize = 1024;

/// Texture width assumed until the renderer reports its real limit.
pub const DEFAULT_MAX_WIDTH: usize = 4096;

/// Reduce `bins` to `columns` values, each the maximum of the bins it covers.
///
/// Returns the input unchanged if it already fits.
pub fn max_pool(bins: &[f32], columns: usize) -> Cow<'_, [f32]> {
    let n = bins.len();
    if columns == 0 || n <= columns {
        return Cow::Borrowed(bins);
    }
    let pooled = (0..columns)
        .map(|c| {
            let start = c * n / columns;
            let end = ((c + 1) * n / columns).max(start + 1);
            bins[start..end].iter().copied().fold(f32::NEG_INFINITY, f32::max)
        })
        .collect();
    Cow::Owned(pooled)
}

/// Scrolling spectrogram image, newest row at the top.
///
/// One row per accepted frame. Pushing a row moves every older row down by one
/// and drops the bottom row. A change of bin count clears the image. Rows wider
/// than the texture limit are max-pooled down to it.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallRaster {
    width: usize,
    rows: usize,
    max_width: usize,
    filled: usize,
    pixels: Vec<Color32>,
    generation: u64,
}

impl WaterfallRaster {
    pub fn new(rows: usize) -> Self {
        Self {
            width: 0,
            rows: rows.max(1),
            max_width: DEFAULT_MAX_WIDTH,
            filled: 0,
            pixels: Vec::new(),
            generation: 0,
        }
    }

    /// Insert a new line of colour-mapped bins at the top of the waterfall.
    pub fn push_row(&mut self, bins: &[f32], range: &DisplayRange, palette: &Palette) {
        if bins.is_empty() {
            return;
        }
        let bins = max_pool(bins, self.max_width);
        if bins.len() != self.width {
            self.width = bins.len();
            self.pixels = vec![Color32::BLACK; self.width * self.rows];
            self.filled = 0;
        }

        let width = self.width;
        self.pixels.copy_within(0..(self.rows - 1) * width, width);
        for (pixel, &value) in self.pixels[..width].iter_mut().zip(bins.iter()) {
            *pixel = palette.color_for(value, range);
        }

        self.filled = (self.filled + 1).min(self.rows);
        self.generation += 1;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cap the image width. A raster already wider than `max_width` is cleared.
    pub fn set_max_width(&mut self, max_width: usize) {
        let max_width = max_width.max(1);
        if max_width == self.max_width {
            return;
        }
        self.max_width = max_width;
        if self.width > max_width {
            self.width = 0;
            self.pixels.clear();
            self.filled = 0;
            self.generation += 1;
        }
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows that received data since the last reset.
    pub fn filled_rows(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Row `index`, 0 being the newest.
    pub fn row(&self, index: usize) -> &[Color32] {
        let start = index * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Bumped on every change of the pixels, used to skip redundant texture uploads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rows that fit in `height_px` physical pixels without rescaling.
    pub fn visible_rows(&self, height_px: usize) -> usize {
        self.filled.min(height_px)
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: [self.width, self.rows],
            pixels: self.pixels.clone(),
            ..Default::default()
        }
    }
}

/// Waterfall display widget.
///
/// The raster is built on frame arrival. Rendering only uploads it to the GPU
/// when its generation changed, then blits the top rows one pixel per row.
pub struct Waterfall {
    raster: WaterfallRaster,
    texture: Option<TextureHandle>,
    uploaded_generation: Option<u64>,
}

impl Waterfall {
    pub fn new(history_rows: usize) -> Self {
        Self {
            raster: WaterfallRaster::new(history_rows),
            texture: None,
            uploaded_generation: None,
        }
    }

    pub fn raster(&self) -> &WaterfallRaster {
        &self.raster
    }

    pub fn push_row(&mut self, bins: &[f32], range: &DisplayRange, palette: &Palette) {
        self.raster.push_row(bins, range, palette);
    }

    fn upload(&mut self, ui: &Ui) {
        let generation = self.raster.generation();
        if self.uploaded_generation == Some(generation) {
            return;
        }
        let image = self.raster.to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ui.ctx().load_texture("waterfall", image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_generation = Some(generation);
    }
}

impl Widget for &mut Waterfall {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::BLACK);

        self.raster
            .set_max_width(ui.ctx().input(|i| i.max_texture_side));
        if self.raster.is_empty() {
            painter.text(
                rect.center(),
                eframe::egui::Align2::CENTER_CENTER,
                "Waiting for spectrum data...",
                eframe::egui::FontId::proportional(14.0),
                Color32::GRAY,
            );
            return response;
        }

        self.upload(ui);

        let pixels_per_point = ui.ctx().pixels_per_point();
        let visible = self
            .raster
            .visible_rows((rect.height() * pixels_per_point) as usize);
        if let Some(texture) = &self.texture {
            let dest = Rect::from_min_size(
                rect.min,
                vec2(rect.width(), visible as f32 / pixels_per_point),
            );
            let uv = Rect::from_min_max(
                Pos2::ZERO,
                pos2(1.0, visible as f32 / self.raster.rows() as f32),
            );
            painter.image(texture.id(), dest, uv, Color32::WHITE);
        }

        response
    }
}
