//! Text compositing: stamp the resolved date onto a copy of the source.
//!
//! The [`Stamper`] trait is the seam between the batch driver and the pixel
//! work, so pipeline logic can be tested with a mock instead of a resolved
//! system font. The production implementation is [`Compositor`].
//!
//! The blend is a true source-over composite: glyphs are rasterized into a
//! transparent strip whose alpha is glyph coverage, the configured opacity
//! is multiplied in, and the strip is overlaid onto an opaque copy of the
//! source. Drawing semi-transparent text straight onto the canvas would
//! interpolate the alpha channel instead of compositing, which is why the
//! strip exists.

use crate::config::WatermarkConfig;
use crate::render::{font, placement};
use ab_glyph::FontVec;
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Font(#[from] font::FontError),
}

/// Applies watermark text to an image, producing a new image.
pub trait Stamper {
    /// Render `text` onto a copy of `image`. Must not modify the input.
    fn apply(&self, image: &DynamicImage, text: &str) -> Result<DynamicImage, RenderError>;
}

/// Production stamper: anti-aliased glyph rendering via the configured
/// family/weight/size, composited at the configured position and opacity.
pub struct Compositor {
    config: WatermarkConfig,
    // Resolved on first use; None records a failed lookup so every
    // subsequent file fails fast with the same error.
    font: OnceLock<Option<FontVec>>,
}

impl Compositor {
    pub fn new(config: WatermarkConfig) -> Self {
        Self {
            config,
            font: OnceLock::new(),
        }
    }

    fn font(&self) -> Result<&FontVec, RenderError> {
        let resolved = self.font.get_or_init(|| {
            match font::resolve(self.config.font_family(), self.config.font_weight()) {
                Ok(font) => Some(font),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        });
        resolved.as_ref().ok_or_else(|| {
            RenderError::Font(font::FontError::NotFound {
                family: self.config.font_family().to_string(),
            })
        })
    }
}

impl Stamper for Compositor {
    fn apply(&self, image: &DynamicImage, text: &str) -> Result<DynamicImage, RenderError> {
        if text.trim().is_empty() {
            debug!("Blank watermark text, returning image unchanged");
            return Ok(image.clone());
        }

        // Flatten to opaque RGB first: this copies the source pixels into a
        // fresh canvas and discards any source alpha. The alpha channel is
        // reserved for the watermark blend.
        let mut canvas: RgbaImage = DynamicImage::ImageRgb8(image.to_rgb8()).into_rgba8();

        let font = self.font()?;
        let scale = self.config.px_scale();
        let (text_w, text_h) = text_size(scale, font, text);

        let origin = placement::place(
            canvas.width(),
            canvas.height(),
            text_w,
            text_h,
            self.config.position(),
            self.config.margin(),
        );
        // place() anchors y at the baseline; draw_text_mut wants the glyph
        // box top. The clamp guarantees y >= text_h.
        let top = origin.y - text_h;

        // Rasterize into a strip pre-filled with the tint at zero alpha, so
        // coverage interpolation yields (tint, coverage × 255) instead of a
        // premultiplied color that would darken glyph edges.
        let tint = self.config.color();
        let mut strip = RgbaImage::from_pixel(
            text_w.max(1),
            text_h.max(1),
            Rgba([tint.r, tint.g, tint.b, 0]),
        );
        draw_text_mut(
            &mut strip,
            Rgba([tint.r, tint.g, tint.b, 255]),
            0,
            0,
            scale,
            font,
            text,
        );

        let opacity = self.config.draw_color()[3] as u32;
        for pixel in strip.pixels_mut() {
            pixel[3] = ((pixel[3] as u32 * opacity) / 255) as u8;
        }

        debug!(
            "Stamping '{}' at ({}, {}) [{}x{}]",
            text, origin.x, top, text_w, text_h
        );
        imageops::overlay(&mut canvas, &strip, origin.x as i64, top as i64);

        Ok(DynamicImage::ImageRgb8(
            DynamicImage::ImageRgba8(canvas).to_rgb8(),
        ))
    }
}
