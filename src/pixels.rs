use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::ImageError;

pub type Sample = u32;
pub type Plane = Array2<Sample>;

pub const GRAYSCALE_CHANNELS: usize = 1;
pub const COLOUR_CHANNELS: usize = 3;

/// Owned sample grid laid out as `[channel][row][col]`.
///
/// Filters read and write the active channel only. Cloning gives an
/// independent copy of the whole grid.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    samples: Array3<Sample>,
    depth: Sample,
    active_channel: usize,
}

impl PixelBuffer {
    pub fn allocate(
        width: usize,
        height: usize,
        channel_count: usize,
        depth: Sample,
    ) -> Result<PixelBuffer, ImageError> {
        let valid_channels = channel_count == GRAYSCALE_CHANNELS || channel_count == COLOUR_CHANNELS;
        if width == 0 || height == 0 || depth == 0 || !valid_channels {
            return Err(ImageError::Allocation {
                width,
                height,
                channels: channel_count,
                depth,
            });
        }
        Ok(PixelBuffer {
            samples: Array3::zeros((channel_count, height, width)),
            depth,
            active_channel: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.samples.dim().2
    }

    pub fn height(&self) -> usize {
        self.samples.dim().1
    }

    pub fn channel_count(&self) -> usize {
        self.samples.dim().0
    }

    pub fn depth(&self) -> Sample {
        self.depth
    }

    pub fn active_channel(&self) -> usize {
        self.active_channel
    }

    pub fn is_colour(&self) -> bool {
        self.channel_count() == COLOUR_CHANNELS
    }

    pub fn get(&self, channel: usize, row: usize, col: usize) -> Result<Sample, ImageError> {
        self.samples
            .get((channel, row, col))
            .copied()
            .ok_or(ImageError::Index { channel, row, col })
    }

    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: Sample) -> Result<(), ImageError> {
        if value > self.depth {
            return Err(ImageError::parameter("sample", value));
        }
        let sample = self
            .samples
            .get_mut((channel, row, col))
            .ok_or(ImageError::Index { channel, row, col })?;
        *sample = value;
        Ok(())
    }

    /// Swaps in a whole new grid with `channel_count` planes of the same size.
    pub fn replace_channel_count(&mut self, channel_count: usize, samples: Array3<Sample>) -> Result<(), ImageError> {
        let expected = (channel_count, self.height(), self.width());
        let valid_channels = channel_count == GRAYSCALE_CHANNELS || channel_count == COLOUR_CHANNELS;
        if samples.dim() != expected || !valid_channels {
            let (_, height, width) = samples.dim();
            return Err(ImageError::Allocation {
                width,
                height,
                channels: channel_count,
                depth: self.depth,
            });
        }
        self.samples = samples;
        self.active_channel = 0;
        Ok(())
    }

    pub(crate) fn set_active_channel(&mut self, channel: usize) -> Result<(), ImageError> {
        if channel >= self.channel_count() {
            return Err(ImageError::Index { channel, row: 0, col: 0 });
        }
        self.active_channel = channel;
        Ok(())
    }

    pub fn plane(&self, channel: usize) -> Option<ArrayView2<'_, Sample>> {
        (channel < self.channel_count()).then(|| self.samples.index_axis(Axis(0), channel))
    }

    pub fn samples(&self) -> &Array3<Sample> {
        &self.samples
    }

    /// Owned copy of the active plane, used as the read side of a filter.
    pub fn active_plane(&self) -> Plane {
        self.samples.index_axis(Axis(0), self.active_channel).to_owned()
    }

    /// Writes a full replacement for the active plane.
    pub fn commit_plane(&mut self, plane: Plane) {
        debug_assert_eq!(plane.dim(), (self.height(), self.width()));
        self.samples
            .index_axis_mut(Axis(0), self.active_channel)
            .assign(&plane);
    }
}
