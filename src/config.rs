use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::imops::*;

pub const DEFAULT_PICTURE_DIR: &str = "pic";
pub const DEFAULT_VIEWER: &str = "display";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Pipeline module #{0} has no name")]
    MissingName(usize),

    #[error("Wrong pipeline module name: {0}")]
    UnknownModule(String),

    #[error("Invalid settings for {name}: {source}")]
    InvalidModule {
        name: String,
        source: toml::de::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct RawConfig {
    pub picture_dir: Option<PathBuf>,
    pub viewer: Option<String>,
    #[serde(default)]
    pub pipeline_modules: Vec<toml::Table>,
}

pub struct PipelineConfig {
    pub picture_dir: PathBuf,
    pub viewer: String,
    pub pipeline_modules: Vec<Box<dyn PipelineModule>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            picture_dir: PathBuf::from(DEFAULT_PICTURE_DIR),
            viewer: DEFAULT_VIEWER.to_string(),
            pipeline_modules: vec![],
        }
    }
}

fn from_toml<T>(name: &str, module: toml::Table) -> Result<Box<dyn PipelineModule>, ConfigError>
where
    T: DeserializeOwned + PipelineModule + 'static,
{
    let cfg: T = toml::Value::Table(module).try_into().map_err(|source| ConfigError::InvalidModule {
        name: name.to_string(),
        source,
    })?;
    Ok(Box::new(cfg))
}

pub fn parse_config(data_string: &str) -> Result<PipelineConfig, ConfigError> {
    let data: RawConfig = toml::from_str(data_string)?;

    let mut config = PipelineConfig::default();
    if let Some(picture_dir) = data.picture_dir {
        config.picture_dir = picture_dir;
    }
    if let Some(viewer) = data.viewer {
        config.viewer = viewer;
    }

    for (position, mut module) in data.pipeline_modules.into_iter().enumerate() {
        let name = match module.remove("name") {
            Some(toml::Value::String(name)) => name,
            _ => return Err(ConfigError::MissingName(position)),
        };
        let pipeline_module = match name.as_str() {
            "Negative" =>               from_toml::<Negative>(&name, module)?,
            "Thresholding" =>           from_toml::<Thresholding>(&name, module)?,
            "HalfThresholdBlack" =>     from_toml::<HalfThresholdBlack>(&name, module)?,
            "HalfThresholdWhite" =>     from_toml::<HalfThresholdWhite>(&name, module)?,
            "GammaCorrection" =>        from_toml::<GammaCorrection>(&name, module)?,
            "LevelAdjustment" =>        from_toml::<LevelAdjustment>(&name, module)?,
            "Contouring" =>             from_toml::<Contouring>(&name, module)?,
            "HorizontalBlur" =>         from_toml::<HorizontalBlur>(&name, module)?,
            "VerticalBlur" =>           from_toml::<VerticalBlur>(&name, module)?,
            "FullBlur" =>               from_toml::<FullBlur>(&name, module)?,
            "HistogramStretching" =>    from_toml::<HistogramStretching>(&name, module)?,
            "SelectColour" =>           from_toml::<SelectColour>(&name, module)?,
            "Grayscale" =>              from_toml::<Grayscale>(&name, module)?,
            _ => return Err(ConfigError::UnknownModule(name)),
        };

        config.pipeline_modules.push(pipeline_module);
    }
    Ok(config)
}

pub fn read_config(config_path: &Path) -> Result<PipelineConfig, ConfigError> {
    let data_string = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    parse_config(&data_string)
}
