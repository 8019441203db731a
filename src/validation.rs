//! Checks for raw parameter text typed at the menu prompt.
//!
//! Malformed text is an [`ImageError::InvalidInput`]; well-formed numbers
//! outside a filter's domain are an [`ImageError::ParameterRange`].
use crate::error::ImageError;

/// Digits with at most one dot, starting with a digit.
pub fn is_double(input: &str) -> bool {
    let mut chars = input.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut dot_found = false;
    for c in chars {
        match c {
            '0'..='9' => {}
            '.' if !dot_found => dot_found = true,
            _ => return false,
        }
    }
    true
}

pub fn is_integer(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

fn parse_double(input: &str) -> Result<f64, ImageError> {
    let input = input.trim();
    if !is_double(input) {
        return Err(ImageError::InvalidInput(input.to_string()));
    }
    input
        .parse()
        .map_err(|_| ImageError::InvalidInput(input.to_string()))
}

pub fn parse_threshold(input: &str) -> Result<f64, ImageError> {
    let threshold = parse_double(input)?;
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ImageError::parameter("threshold", threshold))
    }
}

pub fn parse_gamma(input: &str) -> Result<f64, ImageError> {
    let gamma = parse_double(input)?;
    if gamma > 0.0 && gamma.is_finite() {
        Ok(gamma)
    } else {
        Err(ImageError::parameter("gamma parameter", gamma))
    }
}

pub fn parse_level(input: &str) -> Result<f64, ImageError> {
    let level = parse_double(input)?;
    if level > 0.0 && level < 0.5 {
        Ok(level)
    } else {
        Err(ImageError::parameter("level", level))
    }
}

pub fn parse_radius(input: &str) -> Result<usize, ImageError> {
    let input = input.trim();
    if !is_integer(input) {
        return Err(ImageError::InvalidInput(input.to_string()));
    }
    // all digits, so the only parse failure left is overflow
    let radius: usize = input
        .parse()
        .map_err(|_| ImageError::parameter("radius", input))?;
    if radius > 0 {
        Ok(radius)
    } else {
        Err(ImageError::parameter("radius", radius))
    }
}
