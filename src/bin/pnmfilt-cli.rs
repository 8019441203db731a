use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser as Clap_parser;
use pnmfilt::config::{self, PipelineConfig};
use pnmfilt::menu::Shell;
use pnmfilt::{codec, pipeline::run_pixel_pipeline};

#[derive(Clap_parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PGM/PPM image to filter; without it the interactive menu starts
    #[arg(name = "input path", value_name = "input_path")]
    input_path: Option<PathBuf>,

    /// Where the filtered image is written in batch mode
    #[arg(short, name = "output path", value_name = "output_path")]
    output_path: Option<PathBuf>,

    /// TOML file with pipeline modules and shell settings
    #[arg(short, name = "config path", value_name = "config_path")]
    config_path: Option<PathBuf>,

    /// Directory the menu loads and saves images in
    #[arg(long, value_name = "dir")]
    picture_dir: Option<PathBuf>,

    /// Program used to display images
    #[arg(long, value_name = "program")]
    viewer: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config_path {
        Some(path) => config::read_config(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(picture_dir) = args.picture_dir {
        config.picture_dir = picture_dir;
    }
    if let Some(viewer) = args.viewer {
        config.viewer = viewer;
    }

    let Some(input_path) = args.input_path else {
        let mut shell = Shell::from_config(&config);
        let stdin = io::stdin();
        shell.run(&mut stdin.lock(), &mut io::stdout())?;
        return Ok(());
    };

    if args.config_path.is_none() {
        bail!("batch mode needs a pipeline config, pass one with -c");
    }

    let decode = Instant::now();
    let mut image = codec::read_file(&input_path)
        .with_context(|| format!("loading {}", input_path.display()))?;
    log::info!("decode file: {:.2?}", decode.elapsed());

    run_pixel_pipeline(&mut image, &config)?;

    let output_path = args.output_path.unwrap_or_else(|| {
        PathBuf::from(format!("result.{}", codec::extension_for(image.channel_count())))
    });
    codec::write_file(&output_path, &image)
        .with_context(|| format!("saving {}", output_path.display()))?;
    log::info!("total time: {:.2?}", decode.elapsed());
    Ok(())
}
