use pnmfilt::PixelBuffer;

/// Deterministic pseudo-random samples spread over `[0, depth]`.
pub fn noise(width: usize, height: usize, channels: usize, depth: u32, seed: u64) -> PixelBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut image = PixelBuffer::allocate(width, height, channels, depth).unwrap();
    let mut state = seed;
    for channel in 0..channels {
        for row in 0..height {
            for col in 0..width {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let value = (state % (depth as u64 + 1)) as u32;
                image.set(channel, row, col, value).unwrap();
            }
        }
    }
    image
}

/// Horizontal gradient from 0 at the left edge to `depth` at the right edge.
#[allow(dead_code)]
pub fn gradient(width: usize, height: usize, depth: u32) -> PixelBuffer {
    let mut image = PixelBuffer::allocate(width, height, 1, depth).unwrap();
    let span = (width.max(2) - 1) as u64;
    for row in 0..height {
        for col in 0..width {
            let value = (col as u64 * depth as u64 / span) as u32;
            image.set(0, row, col, value).unwrap();
        }
    }
    image
}
