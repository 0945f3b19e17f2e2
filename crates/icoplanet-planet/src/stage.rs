//! Generation stage trait, stage identifiers and pipeline errors.

use std::sync::Arc;

use icoplanet_mesh::{Mesh, MeshError};
use icoplanet_surface::{PixelBuffer, SurfaceError};
use thiserror::Error;

use crate::settings::PlanetSettings;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Icosphere construction and terrain displacement.
    Mesh,
    /// Surface color lookup texture.
    Surface,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Mesh => "mesh",
            StageId::Surface => "surface",
        }
    }
}

/// Surface texture together with the liquid fraction a renderer needs to
/// pick between its land and sea halves.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceTexture {
    pub pixels: PixelBuffer,
    pub normalized_liquid: f32,
}

/// Output of a single stage.
#[derive(Clone, Debug)]
pub enum Artifact {
    Mesh(Arc<Mesh>),
    Surface(Arc<SurfaceTexture>),
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("stage '{stage}' failed: {reason}")]
    StageFailed { stage: &'static str, reason: String },
}

/// A step of planet generation.
///
/// A stage holds on to the artifact it last produced until [`clear`] is
/// called, so a front end can keep using it without going through the
/// pipeline.
///
/// [`clear`]: GenerationStage::clear
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Produce this stage's artifact, or `None` if the settings disable it.
    fn generate(&mut self, settings: &PlanetSettings) -> Result<Option<Artifact>, PipelineError>;

    /// Release whatever the last [`generate`](GenerationStage::generate) call
    /// left behind.
    fn clear(&mut self);
}
