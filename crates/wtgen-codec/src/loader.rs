//! The loader pipeline: document text in, normalized wavetable out.

use wtgen_doc::SpectralData;

use crate::error::{CodecError, CodecResult};
use crate::framepack::FramepackDecoder;
use crate::minphase::MinimumPhase;
use crate::postprocess;
use crate::spectrum;
use crate::wavetable::Wavetable;

/// Default payload size limit: 64 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Largest decoded payload the loader will accept.
    pub max_payload_bytes: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

/// Decodes a wtgen-1 document into a wavetable.
///
/// Runs the whole pipeline: container validation, base64 decoding, framepack
/// header and frame records, per-frame spectrum assembly and minimum-phase
/// reconstruction, then DC removal and peak normalization. The first failing
/// stage aborts; nothing is published as a side effect.
pub fn decode_wavetable(text: &str, name: &str, config: &LoaderConfig) -> CodecResult<Wavetable> {
    if text.trim().is_empty() {
        return Err(CodecError::EmptyDocument);
    }

    let doc = SpectralData::from_json(text)?;
    let payload = doc.decode_payload(config.max_payload_bytes)?;

    let decoder = FramepackDecoder::new(&payload, &doc.params)?;
    let header = decoder.header();
    let n = header.table_size;

    let banding = doc
        .params
        .banding
        .unwrap_or_else(|| spectrum::default_band_range(header.harmonics, n));

    let reconstructor = MinimumPhase::new(n);
    let mut samples = Vec::with_capacity(header.frames * n);
    for record in decoder {
        let record = record?;
        let mag = spectrum::assemble_half_spectrum(&record, n, banding);
        samples.extend_from_slice(&reconstructor.reconstruct(&mag)?);
    }

    let mut wavetable = Wavetable::from_frames(n, header.frames, samples, name);
    for frame in wavetable.frames_mut() {
        postprocess::remove_dc(frame);
    }
    postprocess::normalize_peak(wavetable.samples_mut());

    Ok(wavetable)
}
