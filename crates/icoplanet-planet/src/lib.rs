//! Planet generation: settings, stages and the pipeline that runs them.

mod pipeline;
mod settings;
mod stage;
mod stages;

pub use pipeline::{PlanetOutput, Pipeline};
pub use settings::PlanetSettings;
pub use stage::{Artifact, GenerationStage, PipelineError, StageId, SurfaceTexture};
pub use stages::{MeshStage, SurfaceStage};

pub use icoplanet_mesh::{Mesh, MeshError};
pub use icoplanet_surface::{Gradient, PixelBuffer, SurfaceConfig, SurfaceError};
pub use icoplanet_terrain::{GeneralConfig, LandscapeConfig};
