//! Watermark rendering: placement math, font discovery, text compositing.
//!
//! The module is split the same way the work divides:
//! - **Placement**: pure functions for the draw origin (unit testable)
//! - **Font**: locating a loadable face for the configured family/weight
//! - **Compositor**: the [`Stamper`] trait and its production impl

pub mod compositor;
pub mod font;
pub mod placement;

pub use compositor::{Compositor, RenderError, Stamper};
pub use font::FontError;
pub use placement::{DrawOrigin, place};
