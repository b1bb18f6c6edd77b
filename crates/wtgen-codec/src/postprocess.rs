//! Per-frame DC removal and global peak normalization.

/// Normalization target; leaves a little headroom below full scale.
pub const TARGET_PEAK: f32 = 0.999;

/// Peaks at or below this are treated as silence and left alone.
pub const MIN_PEAK: f32 = 1.0e-6;

/// Subtracts the arithmetic mean from one frame. The mean is accumulated in
/// f64 so long frames do not drift.
pub fn remove_dc(frame: &mut [f32]) {
    if frame.is_empty() {
        return;
    }
    let mean = frame.iter().map(|&s| s as f64).sum::<f64>() / frame.len() as f64;
    for s in frame.iter_mut() {
        *s = (*s as f64 - mean) as f32;
    }
}

/// Scales all samples so the global peak lands on [`TARGET_PEAK`]. Silent
/// input (peak <= [`MIN_PEAK`]) is returned unchanged. Returns the peak that
/// was found.
pub fn normalize_peak(samples: &mut [f32]) -> f32 {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > MIN_PEAK {
        let gain = TARGET_PEAK / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
    peak
}
