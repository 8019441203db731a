//! Interactive single-character menu around a loaded image.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::codec;
use crate::config::PipelineConfig;
use crate::display::display;
use crate::error::ImageError;
use crate::imops::*;
use crate::pixels::PixelBuffer;
use crate::validation::{parse_gamma, parse_level, parse_radius, parse_threshold};

pub const MENU: &str = "\
User menu - image processing
l - load an image
s - save current state of the image
d - display current state of the image
c - select new colour that will be processed (only for colourful images)
o - convert PPM to PGM (only for colourful images)
n - add negative filter to an image
t - add threshold filter to an image
b - add half-threshold of black filter to an image
w - add half-threshold of white filter to an image
g - add gamma correction filter to an image
a - add level adjustment filter to an image
k - add contouring filter to an image
x - add horizontal blurring filter to an image
y - add vertical blurring filter to an image
f - add full blurring filter to an image
h - add histogram stretching filter to an image
q - quit the program
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    ToGrayscale,
    Negative,
    Thresholding,
    HalfThresholdBlack,
    HalfThresholdWhite,
    GammaCorrection,
    LevelAdjustment,
    Contouring,
    HorizontalBlur,
    VerticalBlur,
    FullBlur,
    HistogramStretching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Load,
    Save,
    Display,
    SelectColour,
    Filter(Filter),
    Quit,
}

impl Command {
    /// Exactly one character selects a command.
    pub fn from_selection(selection: &str) -> Option<Command> {
        let mut chars = selection.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let command = match c {
            'l' => Command::Load,
            's' => Command::Save,
            'd' => Command::Display,
            'c' => Command::SelectColour,
            'o' => Command::Filter(Filter::ToGrayscale),
            'n' => Command::Filter(Filter::Negative),
            't' => Command::Filter(Filter::Thresholding),
            'b' => Command::Filter(Filter::HalfThresholdBlack),
            'w' => Command::Filter(Filter::HalfThresholdWhite),
            'g' => Command::Filter(Filter::GammaCorrection),
            'a' => Command::Filter(Filter::LevelAdjustment),
            'k' => Command::Filter(Filter::Contouring),
            'x' => Command::Filter(Filter::HorizontalBlur),
            'y' => Command::Filter(Filter::VerticalBlur),
            'f' => Command::Filter(Filter::FullBlur),
            'h' => Command::Filter(Filter::HistogramStretching),
            'q' => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

enum Outcome {
    Done(String),
    Quit,
}

pub struct Shell {
    image: Option<PixelBuffer>,
    picture_dir: PathBuf,
    viewer: String,
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

type FilterStep = (Box<dyn PipelineModule>, &'static str);

fn boxed<M: PipelineModule + 'static>(module: M, message: &'static str) -> FilterStep {
    (Box::new(module), message)
}

/// Prompts for the filter's parameter, if any. `None` means input ended.
fn filter_module<R: BufRead, W: Write>(
    filter: Filter,
    input: &mut R,
    output: &mut W,
) -> Result<Option<FilterStep>, ImageError> {
    let step = match filter {
        Filter::ToGrayscale => boxed(Grayscale {}, "Image converted successfully."),
        Filter::Negative => boxed(Negative {}, "Negative filter added successfully."),
        Filter::Contouring => boxed(Contouring {}, "Contouring filter added successfully."),
        Filter::HistogramStretching => boxed(
            HistogramStretching {},
            "Histogram stretching filter added successfully.",
        ),
        Filter::Thresholding | Filter::HalfThresholdBlack | Filter::HalfThresholdWhite => {
            let Some(text) = prompt(input, output, "Enter threshold value (0; 1): ")? else {
                return Ok(None);
            };
            let threshold = parse_threshold(&text)?;
            match filter {
                Filter::Thresholding => boxed(
                    Thresholding { threshold },
                    "Thresholding filter added successfully.",
                ),
                Filter::HalfThresholdBlack => boxed(
                    HalfThresholdBlack { threshold },
                    "Half-thresholding of black filter added successfully.",
                ),
                _ => boxed(
                    HalfThresholdWhite { threshold },
                    "Half-thresholding of white filter added successfully.",
                ),
            }
        }
        Filter::GammaCorrection => {
            let Some(text) = prompt(input, output, "Enter gamma parameter value: ")? else {
                return Ok(None);
            };
            let gamma = parse_gamma(&text)?;
            boxed(GammaCorrection { gamma }, "Gamma correction filter added successfully.")
        }
        Filter::LevelAdjustment => {
            let Some(text) = prompt(input, output, "Enter level adjustment value (0; 0.5): ")? else {
                return Ok(None);
            };
            let level = parse_level(&text)?;
            boxed(LevelAdjustment { level }, "Level adjustment filter added successfully.")
        }
        Filter::HorizontalBlur | Filter::VerticalBlur | Filter::FullBlur => {
            let Some(text) = prompt(input, output, "Enter blurring radius value: ")? else {
                return Ok(None);
            };
            let radius = parse_radius(&text)?;
            match filter {
                Filter::HorizontalBlur => boxed(
                    HorizontalBlur { radius },
                    "Horizontal blurring filter added successfully.",
                ),
                Filter::VerticalBlur => boxed(
                    VerticalBlur { radius },
                    "Vertical blurring filter added successfully.",
                ),
                _ => boxed(FullBlur { radius }, "Full blurring filter added successfully."),
            }
        }
    };
    Ok(Some(step))
}

impl Shell {
    pub fn new(picture_dir: impl Into<PathBuf>, viewer: impl Into<String>) -> Shell {
        Shell {
            image: None,
            picture_dir: picture_dir.into(),
            viewer: viewer.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Shell {
        Shell::new(config.picture_dir.clone(), config.viewer.clone())
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn picture_dir(&self) -> &Path {
        &self.picture_dir
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.picture_dir.join(name)
    }

    /// Reads commands from `input` until `q` or end of input.
    ///
    /// Failed commands are reported on `output` and the loop carries on.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        loop {
            writeln!(output, "\n{MENU}")?;
            let Some(selection) = prompt(input, output, "Your selection: ")? else {
                return Ok(());
            };
            writeln!(output)?;

            let Some(command) = Command::from_selection(&selection) else {
                writeln!(output, "Error. Your selection does not match any of the available options.")?;
                continue;
            };
            log::debug!("menu command {:?}", command);

            match self.execute(command, input, output) {
                Ok(Outcome::Done(message)) => writeln!(output, "{message}")?,
                Ok(Outcome::Quit) => return Ok(()),
                Err(e) => {
                    log::warn!("{:?} failed: {}", command, e);
                    writeln!(output, "Error. {e}")?;
                }
            }
        }
    }

    fn execute<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome, ImageError> {
        match command {
            Command::Quit => Ok(Outcome::Quit),
            Command::Load => self.load(input, output),
            _ if self.image.is_none() => Ok(Outcome::Done("Error. No image has been loaded yet.".to_string())),
            Command::Save => self.save(input, output),
            Command::Display => {
                if let Some(image) = &self.image {
                    display(image, &self.viewer, &self.picture_dir)?;
                }
                Ok(Outcome::Done("Image displayed successfully.".to_string()))
            }
            Command::SelectColour => self.select_colour(input, output),
            Command::Filter(filter) => self.apply(filter, input, output),
        }
    }

    fn apply<R: BufRead, W: Write>(
        &mut self,
        filter: Filter,
        input: &mut R,
        output: &mut W,
    ) -> Result<Outcome, ImageError> {
        let Some((module, message)) = filter_module(filter, input, output)? else {
            return Ok(Outcome::Quit);
        };
        if let Some(image) = self.image.as_mut() {
            module.process(image)?;
        }
        Ok(Outcome::Done(message.to_string()))
    }

    fn load<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Outcome, ImageError> {
        let Some(name) = prompt(input, output, "Enter text file name with saved image: ")? else {
            return Ok(Outcome::Quit);
        };
        let path = self.resolve(&name);
        let image = codec::read_file(&path)?;
        log::info!(
            "loaded {} ({}x{}, {} channel(s))",
            path.display(),
            image.width(),
            image.height(),
            image.channel_count()
        );
        self.image = Some(image);
        Ok(Outcome::Done("Image loaded successfully.".to_string()))
    }

    fn save<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Outcome, ImageError> {
        let Some(name) = prompt(input, output, "Enter text file name for the image: ")? else {
            return Ok(Outcome::Quit);
        };
        if let Some(image) = &self.image {
            let mut path = self.resolve(&name);
            if path.extension().is_none() {
                path.set_extension(codec::extension_for(image.channel_count()));
            }
            codec::write_file(&path, image)?;
            log::info!("saved {}", path.display());
        }
        Ok(Outcome::Done("Image saved successfully.".to_string()))
    }

    fn select_colour<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Outcome, ImageError> {
        let Some(image) = self.image.as_mut() else {
            return Ok(Outcome::Done("Error. No image has been loaded yet.".to_string()));
        };
        if !image.is_colour() {
            return Err(ImageError::UnsupportedOperation(
                "current image is not colourful".to_string(),
            ));
        }
        loop {
            let text = "\nSelect a colour to be processed:\nr - red\ng - green\nb - blue\n\nYour selection: ";
            let Some(selection) = prompt(input, output, text)? else {
                return Ok(Outcome::Quit);
            };
            match Colour::from_selection(&selection) {
                Some(colour) => {
                    image.select_colour(colour.index())?;
                    return Ok(Outcome::Done(format!(
                        "You have selected {}.\nColour selected successfully.",
                        colour.name()
                    )));
                }
                None => writeln!(
                    output,
                    "Error. Your selection does not match any of the available options."
                )?,
            }
        }
    }
}
