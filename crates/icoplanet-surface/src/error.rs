//! Error types for surface texture generation.

/// Errors produced while building surface textures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A texture was requested with a zero-sized dimension.
    #[error("invalid texture dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: u32, height: u32 },
}

impl SurfaceError {
    /// Reject a zero width or height.
    pub fn check_dimensions(width: u32, height: u32) -> Result<(), Self> {
        if width == 0 || height == 0 {
            return Err(Self::InvalidDimensions { width, height });
        }
        Ok(())
    }
}
