//! Fixed-capacity sample storage for the rotation detector.

/// Samples per batch analysis.
pub const SAMPLE_SIZE: usize = 100;

/// Paired yaw/pitch deltas with an explicit fill cursor.
///
/// Storage is inline; pushing never allocates.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    yaw: [f32; SAMPLE_SIZE],
    pitch: [f32; SAMPLE_SIZE],
    len: usize,
}

impl SampleWindow {
    /// Creates an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            yaw: [0.0; SAMPLE_SIZE],
            pitch: [0.0; SAMPLE_SIZE],
            len: 0,
        }
    }

    /// Appends one pair. Returns true once the window is full.
    ///
    /// Pushing into a full window is a no-op; callers reset after each batch.
    pub fn push(&mut self, yaw: f32, pitch: f32) -> bool {
        if self.len < SAMPLE_SIZE {
            self.yaw[self.len] = yaw;
            self.pitch[self.len] = pitch;
            self.len += 1;
        }
        self.is_full()
    }

    /// Number of stored pairs.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true at capacity.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == SAMPLE_SIZE
    }

    /// Stored yaw deltas, oldest first.
    #[must_use]
    pub fn yaw(&self) -> &[f32] {
        &self.yaw[..self.len]
    }

    /// Stored pitch deltas, oldest first.
    #[must_use]
    pub fn pitch(&self) -> &[f32] {
        &self.pitch[..self.len]
    }

    /// Empties the window without touching storage.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_to_capacity() {
        let mut window = SampleWindow::new();
        for i in 0..SAMPLE_SIZE - 1 {
            assert!(!window.push(i as f32, -(i as f32)));
        }
        assert!(window.push(99.0, -99.0));
        assert_eq!(window.len(), SAMPLE_SIZE);
        assert_eq!(window.yaw()[10], 10.0);
        assert_eq!(window.pitch()[10], -10.0);

        // Full window ignores further pushes
        assert!(window.push(1000.0, 1000.0));
        assert_eq!(window.yaw()[SAMPLE_SIZE - 1], 99.0);

        window.reset();
        assert!(window.is_empty());
        assert!(window.yaw().is_empty());
    }
}
