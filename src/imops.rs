use itertools::{iproduct, Itertools, MinMaxResult};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::helpers::{blur_plane, BlurAxes};
use crate::pixels::{PixelBuffer, Sample, GRAYSCALE_CHANNELS};

pub trait PipelineModule {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError>;
    fn get_name(&self) -> String;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Green,
    Blue,
}

impl Colour {
    pub fn index(self) -> usize {
        match self {
            Colour::Red => 0,
            Colour::Green => 1,
            Colour::Blue => 2,
        }
    }

    pub fn from_selection(selection: &str) -> Option<Colour> {
        match selection {
            "r" => Some(Colour::Red),
            "g" => Some(Colour::Green),
            "b" => Some(Colour::Blue),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Blue => "blue",
        }
    }
}

fn check_threshold(threshold: f64) -> Result<(), ImageError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ImageError::parameter("threshold", threshold))
    }
}

fn check_radius(radius: usize) -> Result<(), ImageError> {
    if radius > 0 {
        Ok(())
    } else {
        Err(ImageError::parameter("radius", radius))
    }
}

impl PixelBuffer {
    /// Applies `f` to every sample of the active plane.
    fn map_active(&mut self, f: impl Fn(Sample) -> Sample) {
        let depth = self.depth();
        let plane = self.active_plane().mapv(|v| f(v).min(depth));
        self.commit_plane(plane);
    }

    // `t*depth` truncated, as every threshold filter compares against it
    fn threshold_limit(&self, threshold: f64) -> Sample {
        (threshold * self.depth() as f64) as Sample
    }

    pub fn select_colour(&mut self, channel: usize) -> Result<&mut PixelBuffer, ImageError> {
        if !self.is_colour() {
            return Err(ImageError::UnsupportedOperation(
                "current image is not colourful".to_string(),
            ));
        }
        self.set_active_channel(channel)?;
        log::debug!("active channel set to {}", channel);
        Ok(self)
    }

    pub fn to_grayscale(&mut self) -> Result<&mut PixelBuffer, ImageError> {
        if !self.is_colour() {
            return Err(ImageError::UnsupportedOperation(
                "current image is not colourful".to_string(),
            ));
        }
        let (channels, height, width) = self.samples().dim();
        let samples = self.samples();
        let grey = Array3::from_shape_fn((GRAYSCALE_CHANNELS, height, width), |(_, row, col)| {
            let sum: u64 = (0..channels).map(|c| samples[[c, row, col]] as u64).sum();
            (sum / channels as u64) as Sample
        });
        self.replace_channel_count(GRAYSCALE_CHANNELS, grey)?;
        Ok(self)
    }

    pub fn negative(&mut self) -> &mut PixelBuffer {
        let depth = self.depth();
        self.map_active(|v| depth - v);
        self
    }

    pub fn thresholding(&mut self, threshold: f64) -> Result<&mut PixelBuffer, ImageError> {
        check_threshold(threshold)?;
        let (limit, depth) = (self.threshold_limit(threshold), self.depth());
        self.map_active(|v| if v <= limit { 0 } else { depth });
        Ok(self)
    }

    pub fn half_threshold_black(&mut self, threshold: f64) -> Result<&mut PixelBuffer, ImageError> {
        check_threshold(threshold)?;
        let limit = self.threshold_limit(threshold);
        self.map_active(|v| if v <= limit { 0 } else { v });
        Ok(self)
    }

    pub fn half_threshold_white(&mut self, threshold: f64) -> Result<&mut PixelBuffer, ImageError> {
        check_threshold(threshold)?;
        let (limit, depth) = (self.threshold_limit(threshold), self.depth());
        self.map_active(|v| if v <= limit { v } else { depth });
        Ok(self)
    }

    pub fn gamma_correction(&mut self, gamma: f64) -> Result<&mut PixelBuffer, ImageError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ImageError::parameter("gamma", gamma));
        }
        let depth = self.depth() as f64;
        self.map_active(|v| (depth * (v as f64 / depth).powf(1.0 / gamma)).round() as Sample);
        Ok(self)
    }

    pub fn level_adjustment(&mut self, level: f64) -> Result<&mut PixelBuffer, ImageError> {
        if !(level > 0.0 && level < 0.5) {
            return Err(ImageError::parameter("level", level));
        }
        let depth = self.depth();
        let black = (depth as f64 * level) as Sample;
        let white = (depth as f64 * (1.0 - level)) as Sample;
        self.map_active(|v| {
            if v <= black {
                0
            } else if v >= white {
                depth
            } else {
                (depth as u64 * (v - black) as u64 / (white - black) as u64) as Sample
            }
        });
        Ok(self)
    }

    pub fn contouring(&mut self) -> &mut PixelBuffer {
        let depth = self.depth();
        let source = self.active_plane();
        let mut target = source.clone();
        let (height, width) = source.dim();

        for (row, col) in iproduct!(0..height.saturating_sub(1), 0..width.saturating_sub(1)) {
            let current = source[[row, col]];
            let down = source[[row + 1, col]].abs_diff(current);
            let right = source[[row, col + 1]].abs_diff(current);
            target[[row, col]] = down.saturating_add(right).min(depth);
        }
        self.commit_plane(target);
        self
    }

    pub fn horizontal_blur(&mut self, radius: usize) -> Result<&mut PixelBuffer, ImageError> {
        self.blur(radius, BlurAxes::Horizontal)
    }

    pub fn vertical_blur(&mut self, radius: usize) -> Result<&mut PixelBuffer, ImageError> {
        self.blur(radius, BlurAxes::Vertical)
    }

    pub fn full_blur(&mut self, radius: usize) -> Result<&mut PixelBuffer, ImageError> {
        self.blur(radius, BlurAxes::Both)
    }

    fn blur(&mut self, radius: usize, axes: BlurAxes) -> Result<&mut PixelBuffer, ImageError> {
        check_radius(radius)?;
        let source = self.active_plane();
        let target = blur_plane(&source, radius, axes, self.depth());
        self.commit_plane(target);
        Ok(self)
    }

    pub fn histogram_stretching(&mut self) -> &mut PixelBuffer {
        let depth = self.depth() as u64;
        let (min, max) = match self.active_plane().iter().minmax() {
            MinMaxResult::MinMax(&min, &max) => (min, max),
            MinMaxResult::OneElement(&v) => (v, v),
            MinMaxResult::NoElements => return self,
        };
        if min == max {
            log::warn!("histogram stretching skipped, plane is constant at {}", min);
            return self;
        }
        let span = (max - min) as u64;
        self.map_active(|v| ((v - min) as u64 * depth / span) as Sample);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Negative {}

impl PipelineModule for Negative {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.negative();
        Ok(())
    }

    fn get_name(&self) -> String {
        "Negative".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Thresholding {
    pub threshold: f64,
}

impl PipelineModule for Thresholding {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.thresholding(self.threshold)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "Thresholding".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HalfThresholdBlack {
    pub threshold: f64,
}

impl PipelineModule for HalfThresholdBlack {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.half_threshold_black(self.threshold)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "HalfThresholdBlack".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HalfThresholdWhite {
    pub threshold: f64,
}

impl PipelineModule for HalfThresholdWhite {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.half_threshold_white(self.threshold)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "HalfThresholdWhite".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GammaCorrection {
    pub gamma: f64,
}

impl PipelineModule for GammaCorrection {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.gamma_correction(self.gamma)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "GammaCorrection".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelAdjustment {
    pub level: f64,
}

impl PipelineModule for LevelAdjustment {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.level_adjustment(self.level)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "LevelAdjustment".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Contouring {}

impl PipelineModule for Contouring {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.contouring();
        Ok(())
    }

    fn get_name(&self) -> String {
        "Contouring".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HorizontalBlur {
    pub radius: usize,
}

impl PipelineModule for HorizontalBlur {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.horizontal_blur(self.radius)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "HorizontalBlur".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerticalBlur {
    pub radius: usize,
}

impl PipelineModule for VerticalBlur {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.vertical_blur(self.radius)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "VerticalBlur".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FullBlur {
    pub radius: usize,
}

impl PipelineModule for FullBlur {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.full_blur(self.radius)?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "FullBlur".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HistogramStretching {}

impl PipelineModule for HistogramStretching {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.histogram_stretching();
        Ok(())
    }

    fn get_name(&self) -> String {
        "HistogramStretching".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SelectColour {
    pub colour: Colour,
}

impl PipelineModule for SelectColour {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.select_colour(self.colour.index())?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "SelectColour".to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Grayscale {}

impl PipelineModule for Grayscale {
    fn process(&self, image: &mut PixelBuffer) -> Result<(), ImageError> {
        image.to_grayscale()?;
        Ok(())
    }

    fn get_name(&self) -> String {
        "Grayscale".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grey(depth: Sample, rows: &[&[Sample]]) -> PixelBuffer {
        let mut image = PixelBuffer::allocate(rows[0].len(), rows.len(), 1, depth).unwrap();
        for (row, values) in rows.iter().enumerate() {
            for (col, &v) in values.iter().enumerate() {
                image.set(0, row, col, v).unwrap();
            }
        }
        image
    }

    fn rows(image: &PixelBuffer) -> Vec<Vec<Sample>> {
        image
            .plane(image.active_channel())
            .unwrap()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }

    #[test]
    fn test_negative() {
        let mut image = grey(255, &[&[0, 128], &[255, 64]]);
        image.negative();
        assert_eq!(rows(&image), vec![vec![255, 127], vec![0, 191]]);
    }

    #[test]
    fn test_negative_twice_restores() {
        let mut image = grey(255, &[&[3, 77, 200], &[255, 0, 9]]);
        let original = image.clone();
        image.negative().negative();
        assert_eq!(image, original);
    }

    #[test]
    fn test_thresholding() {
        let mut image = grey(255, &[&[100, 200, 127, 128]]);
        image.thresholding(0.5).unwrap();
        assert_eq!(rows(&image), vec![vec![0, 255, 0, 255]]);
    }

    #[test]
    fn test_thresholding_rejects_out_of_range() {
        let mut image = grey(255, &[&[100]]);
        assert!(matches!(
            image.thresholding(1.5),
            Err(ImageError::ParameterRange { .. })
        ));
        assert!(image.thresholding(f64::NAN).is_err());
        assert_eq!(rows(&image), vec![vec![100]]);
    }

    #[test]
    fn test_half_thresholds() {
        let mut black = grey(100, &[&[10, 50, 51, 90]]);
        black.half_threshold_black(0.5).unwrap();
        assert_eq!(rows(&black), vec![vec![0, 0, 51, 90]]);

        let mut white = grey(100, &[&[10, 50, 51, 90]]);
        white.half_threshold_white(0.5).unwrap();
        assert_eq!(rows(&white), vec![vec![10, 50, 100, 100]]);
    }

    #[test]
    fn test_gamma_correction() {
        let mut image = grey(100, &[&[0, 25, 100]]);
        image.gamma_correction(2.0).unwrap();
        assert_eq!(rows(&image), vec![vec![0, 50, 100]]);

        assert!(image.gamma_correction(0.0).is_err());
        assert!(image.gamma_correction(-1.0).is_err());
    }

    #[test]
    fn test_level_adjustment() {
        // black = 25, white = 75
        let mut image = grey(100, &[&[20, 25, 50, 60, 75, 99]]);
        image.level_adjustment(0.25).unwrap();
        assert_eq!(rows(&image), vec![vec![0, 0, 50, 70, 100, 100]]);

        assert!(image.level_adjustment(0.5).is_err());
        assert!(image.level_adjustment(0.0).is_err());
    }

    #[test]
    fn test_contouring_uses_snapshot() {
        let mut image = grey(100, &[&[10, 30, 0], &[50, 10, 0], &[0, 0, 7]]);
        image.contouring();
        // (0,0): |50-10| + |30-10| = 60, (0,1): |10-30| + |0-30| = 50
        // (1,0): |0-50| + |10-50| = 90, (1,1): |0-10| + |0-10| = 20
        assert_eq!(
            rows(&image),
            vec![vec![60, 50, 0], vec![90, 20, 0], vec![0, 0, 7]]
        );
    }

    #[test]
    fn test_contouring_clamps() {
        let mut image = grey(10, &[&[0, 10], &[10, 0]]);
        image.contouring();
        assert_eq!(rows(&image), vec![vec![10, 10], vec![10, 0]]);
    }

    #[test]
    fn test_horizontal_blur_single_row() {
        let mut image = grey(100, &[&[10, 20, 30]]);
        image.horizontal_blur(1).unwrap();
        assert_eq!(rows(&image), vec![vec![15, 20, 30]]);
    }

    #[test]
    fn test_vertical_blur_single_column() {
        let mut image = grey(100, &[&[10], &[20], &[30]]);
        image.vertical_blur(1).unwrap();
        assert_eq!(rows(&image), vec![vec![15], vec![20], vec![30]]);
    }

    #[test]
    fn test_full_blur_leaves_last_row_and_column() {
        let mut image = grey(100, &[&[0, 30, 60], &[90, 0, 30], &[60, 90, 0]]);
        image.full_blur(1).unwrap();
        // (0,0): 0+30+90 / 3 = 40, (0,1): 30+0+60+0 / 4 = 22
        // (1,0): 90+0+60+0 / 4 = 37, (1,1): 0+30+90+90+30 / 5 = 48
        assert_eq!(
            rows(&image),
            vec![vec![40, 22, 60], vec![37, 48, 30], vec![60, 90, 0]]
        );
    }

    #[test]
    fn test_blur_rejects_zero_radius() {
        let mut image = grey(100, &[&[10, 20, 30]]);
        assert!(matches!(
            image.full_blur(0),
            Err(ImageError::ParameterRange { .. })
        ));
        assert_eq!(rows(&image), vec![vec![10, 20, 30]]);
    }

    #[test]
    fn test_histogram_stretching() {
        let mut image = grey(100, &[&[10, 10], &[10, 50]]);
        image.histogram_stretching();
        assert_eq!(rows(&image), vec![vec![0, 0], vec![0, 100]]);
    }

    #[test]
    fn test_histogram_stretching_constant_plane() {
        let mut image = grey(100, &[&[42, 42], &[42, 42]]);
        image.histogram_stretching();
        assert_eq!(rows(&image), vec![vec![42, 42], vec![42, 42]]);
    }

    #[test]
    fn test_filters_touch_active_channel_only() {
        let mut image = PixelBuffer::allocate(2, 1, 3, 255).unwrap();
        image.select_colour(Colour::Green.index()).unwrap();
        image.negative();
        assert_eq!(image.get(0, 0, 0).unwrap(), 0);
        assert_eq!(image.get(1, 0, 0).unwrap(), 255);
        assert_eq!(image.get(2, 0, 1).unwrap(), 0);
    }

    #[test]
    fn test_select_colour_on_grayscale_fails() {
        let mut image = grey(255, &[&[1]]);
        for channel in 0..3 {
            assert!(matches!(
                image.select_colour(channel),
                Err(ImageError::UnsupportedOperation(_))
            ));
        }
    }

    #[test]
    fn test_select_colour_index_out_of_range() {
        let mut image = PixelBuffer::allocate(1, 1, 3, 255).unwrap();
        assert!(matches!(image.select_colour(3), Err(ImageError::Index { .. })));
        assert_eq!(image.active_channel(), 0);
    }

    #[test]
    fn test_to_grayscale() {
        let mut image = PixelBuffer::allocate(2, 1, 3, 255).unwrap();
        for (channel, value) in [10, 20, 31].into_iter().enumerate() {
            image.set(channel, 0, 0, value).unwrap();
            image.set(channel, 0, 1, 255).unwrap();
        }
        image.select_colour(2).unwrap();
        image.to_grayscale().unwrap();

        assert_eq!(image.channel_count(), 1);
        assert_eq!(image.active_channel(), 0);
        assert_eq!(rows(&image), vec![vec![20, 255]]);

        assert!(matches!(
            image.to_grayscale(),
            Err(ImageError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_pipeline_module_names() {
        let modules: Vec<Box<dyn PipelineModule>> = vec![
            Box::new(Negative {}),
            Box::new(FullBlur { radius: 2 }),
            Box::new(SelectColour { colour: Colour::Blue }),
        ];
        let names: Vec<String> = modules.iter().map(|m| m.get_name()).collect();
        assert_eq!(names, vec!["Negative", "FullBlur", "SelectColour"]);
    }
}
