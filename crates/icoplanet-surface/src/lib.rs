//! Surface color texture generation: gradients, overlay compositing and the
//! two-axis height/latitude lookup texture.

pub mod blender;
pub mod buffer;
pub mod color;
pub mod error;
pub mod gradient;

pub use blender::{GradientBlender, SurfaceConfig, TextureSize, normalized_liquid_level};
pub use buffer::PixelBuffer;
pub use color::{Rgb, Rgba, inverse_lerp, overlay};
pub use error::SurfaceError;
pub use gradient::{AlphaKey, ColorKey, Gradient, PREVIEW_HEIGHT, PREVIEW_WIDTH};
