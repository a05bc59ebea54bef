//! Raster painting core: dab rasterization, stroke resampling, layers, and the view transform.

pub mod bitmap;
pub mod brush;
pub mod canvas;
pub mod color;
pub mod dab;
pub mod input;
pub mod layer;
pub mod session;
pub mod stroke;
pub mod transform;

pub use canvas::Canvas;
pub use session::PaintSession;
