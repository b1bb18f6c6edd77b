//! The decoded wavetable value.

/// An immutable multi-frame wavetable.
///
/// `frame_count` single-cycle frames of `table_size` samples each, stored
/// contiguously frame-major. Once built by the loader a wavetable is never
/// mutated; realtime readers share it behind an `Arc` and read it lock-free.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    table_size: usize,
    frame_count: usize,
    samples: Vec<f32>,
    name: String,
}

impl Wavetable {
    /// Builds a wavetable from contiguous frame-major samples.
    pub(crate) fn from_frames(
        table_size: usize,
        frame_count: usize,
        samples: Vec<f32>,
        name: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(samples.len(), table_size * frame_count);
        Self {
            table_size,
            frame_count,
            samples,
            name: name.into(),
        }
    }

    /// Samples per frame; a power of two.
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Number of frames along the morph axis.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All samples, frame-major.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// One frame's samples.
    pub fn frame(&self, f: usize) -> &[f32] {
        &self.samples[f * self.table_size..(f + 1) * self.table_size]
    }

    /// Iterates over frames in morph order.
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.chunks_exact(self.table_size)
    }

    pub(crate) fn frames_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.samples.chunks_exact_mut(self.table_size)
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Bilinear read: linear interpolation within the frame at `phase`
    /// (cycles, wrapped) and across adjacent frames at `morph` (0..=1,
    /// clamped). This is the read-only access realtime renderers use against
    /// a snapshot handle.
    pub fn lookup(&self, morph: f32, phase: f64) -> f32 {
        let n = self.table_size;

        let frame_pos = morph.clamp(0.0, 1.0) * (self.frame_count - 1) as f32;
        let f0 = frame_pos.floor() as usize;
        let f1 = (f0 + 1).min(self.frame_count - 1);
        let tf = frame_pos - f0 as f32;

        let p = phase - phase.floor();
        let idx = p * n as f64;
        let i0 = (idx as usize).min(n - 1);
        let i1 = (i0 + 1) % n;
        let t = (idx - i0 as f64) as f32;

        let a = self.frame(f0);
        let b = self.frame(f1);
        let sa = a[i0] + (a[i1] - a[i0]) * t;
        let sb = b[i0] + (b[i1] - b[i0]) * t;
        sa + (sb - sa) * tf
    }
}
