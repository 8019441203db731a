use crate::pixels::{Plane, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxes {
    Horizontal,
    Vertical,
    Both,
}

impl BlurAxes {
    fn horizontal(self) -> bool {
        matches!(self, BlurAxes::Horizontal | BlurAxes::Both)
    }

    fn vertical(self) -> bool {
        matches!(self, BlurAxes::Vertical | BlurAxes::Both)
    }
}

pub fn index2d(height: usize, width: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..(width * height)).map(move |idx| {
        let x = idx % width;
        let y = (idx - x) / width;
        (idx, y, x)
    })
}

/// Number of leading rows (or columns) a neighbourhood filter rewrites.
///
/// The trailing one is left as it was, unless it is the only one.
pub fn interior(len: usize) -> usize {
    if len > 1 {
        len - 1
    } else {
        len
    }
}

/// Samples within `radius` of `(row, col)` along the requested axes, centre excluded.
pub fn get_tail(plane: &Plane, radius: usize, row: usize, col: usize, axes: BlurAxes) -> Vec<Sample> {
    let (height, width) = plane.dim();
    let mut tail = Vec::with_capacity(4 * radius);

    for r in 1..=radius {
        if axes.vertical() {
            if row >= r {
                tail.push(plane[[row - r, col]]);
            }
            if row + r < height {
                tail.push(plane[[row + r, col]]);
            }
        }
        if axes.horizontal() {
            if col >= r {
                tail.push(plane[[row, col - r]]);
            }
            if col + r < width {
                tail.push(plane[[row, col + r]]);
            }
        }
    }
    tail
}

/// Box average of every sample with its in-bounds neighbours, read from `source`.
pub fn blur_plane(source: &Plane, radius: usize, axes: BlurAxes, depth: Sample) -> Plane {
    let (height, width) = source.dim();
    let (rows, cols) = (interior(height), interior(width));
    // nothing past the longer side can be in bounds
    let radius = radius.min(height.max(width));
    let mut target = source.clone();

    for (_, row, col) in index2d(rows, cols) {
        let tail = get_tail(source, radius, row, col, axes);
        let sum: u64 = tail.iter().map(|&v| v as u64).sum::<u64>() + source[[row, col]] as u64;
        let count = tail.len() as u64 + 1;
        target[[row, col]] = ((sum / count) as Sample).min(depth);
    }
    target
}
