use std::time::Instant;

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::error::ImageError;
use crate::pixels::PixelBuffer;

#[derive(Debug, Error)]
#[error("{module} failed: {source}")]
pub struct PipelineError {
    pub module: String,
    #[source]
    pub source: ImageError,
}

/// Runs every configured module in order, stopping at the first failure.
///
/// Modules that ran before the failing one keep their effect.
pub fn run_pixel_pipeline(
    image: &mut PixelBuffer,
    pixel_pipeline: &PipelineConfig,
) -> Result<(), PipelineError> {
    let total = Instant::now();
    for module in &pixel_pipeline.pipeline_modules {
        let now = Instant::now();
        module.process(image).map_err(|source| PipelineError {
            module: module.get_name(),
            source,
        })?;
        log::info!("{} execution time: {:.2?}", module.get_name(), now.elapsed());
    }
    log::info!("pixel pipeline time: {:.2?}", total.elapsed());
    Ok(())
}
