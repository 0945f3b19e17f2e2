//! Ordered execution of generation stages.

use std::sync::Arc;
use std::time::Instant;

use icoplanet_mesh::Mesh;
use tracing::{info, warn};

use crate::settings::PlanetSettings;
use crate::stage::{Artifact, GenerationStage, PipelineError, SurfaceTexture};
use crate::stages::{MeshStage, SurfaceStage};

/// Everything one pipeline run produced.
#[derive(Clone, Debug, Default)]
pub struct PlanetOutput {
    pub mesh: Option<Arc<Mesh>>,
    pub surface: Option<Arc<SurfaceTexture>>,
}

/// Orchestrates generation stages into a complete planet.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Default for Pipeline {
    /// Mesh stage followed by surface stage.
    fn default() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(MeshStage::new()).add_stage(SurfaceStage::new());
        pipeline
    }
}

impl Pipeline {
    /// Creates a pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Adds a stage to the end of the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Names of the stages in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Clear every stage, validate `settings`, then run the stages in order.
    ///
    /// Invalid settings are rejected before any stage runs. If a stage
    /// fails, all stages are cleared again and the error is returned; no
    /// partial output survives a failed run.
    pub fn generate(&mut self, settings: &PlanetSettings) -> Result<PlanetOutput, PipelineError> {
        self.clear();
        if let Err(err) = settings.validate() {
            warn!(error = %err, "rejected planet settings");
            return Err(err);
        }

        let mut output = PlanetOutput::default();
        for index in 0..self.stages.len() {
            let start = Instant::now();
            let result = self.stages[index].generate(settings);
            let stage = self.stages[index].name().to_string();
            match result {
                Ok(Some(Artifact::Mesh(mesh))) => output.mesh = Some(mesh),
                Ok(Some(Artifact::Surface(texture))) => output.surface = Some(texture),
                Ok(None) => {}
                Err(err) => {
                    warn!(stage = %stage, error = %err, "stage failed");
                    self.clear();
                    return Err(err);
                }
            }
            info!(
                stage = %stage,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "stage complete"
            );
        }
        Ok(output)
    }

    /// Release the outputs every stage is holding.
    pub fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
    }
}
