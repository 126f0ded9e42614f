//! Drawing context threaded through a rasterization pass

use log::trace;
use tiny_skia::{Color, FillRule, Paint, Path, Pixmap, PremultipliedColorU8, Stroke, Transform};

use crate::error::RenderError;
use crate::path::Approximator;

use super::config::RasterConfig;

/// Pixel target plus the translation stack groups push onto
#[derive(Debug)]
pub struct Rasterizer {
    pixmap: Pixmap,
    transform: Transform,
    saved: Vec<Transform>,
    approximator: Approximator,
    anti_alias: bool,
}

impl Rasterizer {
    /// A transparent canvas of the given size with default options
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_config(width, height, &RasterConfig::default())
    }

    pub fn with_config(
        width: u32,
        height: u32,
        config: &RasterConfig,
    ) -> Result<Self, RenderError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidCanvas { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            saved: Vec::new(),
            approximator: Approximator::new().with_tolerance(config.tolerance),
            anti_alias: config.anti_alias,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    pub fn approximator(&self) -> &Approximator {
        &self.approximator
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Remember the current transform
    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Return to the last saved transform; unbalanced calls are ignored
    pub fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        trace!("translate by ({}, {})", x, y);
        self.transform = self.transform.pre_translate(x as f32, y as f32);
    }

    /// Fill the whole canvas
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn fill_path(&mut self, path: &Path, color: Color) {
        let paint = self.paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.transform, None);
    }

    pub fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        let paint = self.paint(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.transform, None);
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = self.anti_alias;
        paint
    }
}
