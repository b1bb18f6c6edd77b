//! Half-spectrum assembly from harmonics and banded noise.

use wtgen_doc::BandRange;

use crate::framepack::FrameRecord;

/// Derives the banding range used when the document does not declare one:
/// noise starts just above the last harmonic bin and runs to Nyquist
/// inclusive.
pub fn default_band_range(harmonic_count: usize, table_size: usize) -> BandRange {
    let half = table_size / 2;
    BandRange {
        lo_bin: (harmonic_count + 1).min(half),
        hi_bin: half + 1,
    }
}

/// Builds the magnitude half-spectrum (bins `0..=N/2`) for one frame.
///
/// Harmonic `h` lands on bin `1 + h`; harmonics past Nyquist are discarded.
/// The banded region `[lo_bin, hi_bin)` is split into `B` contiguous
/// sub-ranges and every bin in sub-range `b` is set to that band's level.
/// Band levels overwrite, they do not accumulate. Bin 0 always stays zero.
pub fn assemble_half_spectrum(
    record: &FrameRecord,
    table_size: usize,
    banding: BandRange,
) -> Vec<f32> {
    let half = table_size / 2;
    let mut mag = vec![0.0f32; half + 1];

    for (h, &amp) in record.harmonics.iter().enumerate() {
        let bin = 1 + h;
        if bin <= half {
            mag[bin] = amp;
        }
    }

    let band_count = record.bands.len();
    if band_count > 0 {
        let lo = banding.lo_bin.min(half + 1);
        let hi = banding.hi_bin.min(half + 1).max(lo);
        let span = hi - lo;
        for (b, &level) in record.bands.iter().enumerate() {
            let start = lo + b * span / band_count;
            let end = lo + (b + 1) * span / band_count;
            for bin in start..end {
                mag[bin] = level;
            }
        }
    }

    mag[0] = 0.0;
    mag
}
