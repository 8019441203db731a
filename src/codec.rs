//! Plain-text PGM (`P2`) and PPM (`P3`) reader and writer.
use std::fs;
use std::path::Path;

use itertools::Itertools;
use ndarray::Axis;

use crate::error::ImageError;
use crate::pixels::{PixelBuffer, Sample, COLOUR_CHANNELS, GRAYSCALE_CHANNELS};

pub const GRAYSCALE_MAGIC: &str = "P2";
pub const COLOUR_MAGIC: &str = "P3";

pub fn magic_for(channel_count: usize) -> &'static str {
    if channel_count == COLOUR_CHANNELS {
        COLOUR_MAGIC
    } else {
        GRAYSCALE_MAGIC
    }
}

/// File extension matching the buffer's format, without the dot.
pub fn extension_for(channel_count: usize) -> &'static str {
    if channel_count == COLOUR_CHANNELS {
        "ppm"
    } else {
        "pgm"
    }
}

// `#` starts a comment that runs to the end of its line.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(content, _)| content))
        .flat_map(str::split_whitespace)
}

fn parse_token<T: std::str::FromStr>(token: &str, what: &str) -> Result<T, ImageError> {
    token
        .parse()
        .map_err(|_| ImageError::Format(format!("{what} is not a non-negative integer: {token:?}")))
}

fn next_number<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, ImageError> {
    let token = tokens
        .next()
        .ok_or_else(|| ImageError::Format(format!("missing {what}")))?;
    parse_token(token, what)
}

pub fn load(text: &str) -> Result<PixelBuffer, ImageError> {
    let mut tokens = tokens(text);

    let channel_count = match tokens.next() {
        Some(GRAYSCALE_MAGIC) => GRAYSCALE_CHANNELS,
        Some(COLOUR_MAGIC) => COLOUR_CHANNELS,
        Some(other) => {
            return Err(ImageError::Format(format!(
                "this is neither a PGM nor a PPM image (magic {other:?})"
            )))
        }
        None => return Err(ImageError::Format("empty image file".to_string())),
    };

    let width: usize = next_number(&mut tokens, "width")?;
    let height: usize = next_number(&mut tokens, "height")?;
    let depth: Sample = next_number(&mut tokens, "depth")?;

    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(channel_count))
        .ok_or_else(|| ImageError::Format(format!("image size {width}x{height} is too large")))?;

    // samples come first so a short body never sizes the grid
    let mut values = Vec::new();
    for token in tokens.by_ref().take(expected) {
        let value: Sample = parse_token(token, "sample")?;
        if value > depth {
            return Err(ImageError::Format(format!(
                "sample {value} exceeds depth {depth}"
            )));
        }
        values.push(value);
    }
    if values.len() != expected {
        return Err(ImageError::Format(format!(
            "expected {expected} samples, found {}",
            values.len()
        )));
    }
    let mut image = PixelBuffer::allocate(width, height, channel_count, depth)?;

    // body is interleaved per pixel, the grid is planar
    for (pixel, chunk) in values.chunks_exact(channel_count).enumerate() {
        let (row, col) = (pixel / width, pixel % width);
        for (channel, &value) in chunk.iter().enumerate() {
            image.set(channel, row, col, value)?;
        }
    }

    log::debug!(
        "loaded {} image {}x{} depth {}",
        magic_for(channel_count),
        width,
        height,
        depth
    );
    Ok(image)
}

pub fn save(image: &PixelBuffer) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", magic_for(image.channel_count())));
    out.push_str(&format!("{} {} {}\n", image.width(), image.height(), image.depth()));

    let samples = image.samples();
    for row in 0..image.height() {
        let line = samples
            .index_axis(Axis(1), row)
            .t()
            .iter()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn read_file(path: &Path) -> Result<PixelBuffer, ImageError> {
    let text = fs::read_to_string(path)?;
    load(&text)
}

pub fn write_file(path: &Path, image: &PixelBuffer) -> Result<(), ImageError> {
    fs::write(path, save(image))?;
    Ok(())
}
