//! The wtgen-1 document container.
//!
//! A wtgen-1 document is a UTF-8 JSON object carrying a compact spectral
//! representation of a multi-frame wavetable:
//!
//! ```json
//! { "schema": "wtgen-1",
//!   "program": { "nodes": [
//!     { "op": "spectralData",
//!       "p": { "codec": "harm-noise-framepack-v1",
//!              "tableSize": 256, "frames": 8,
//!              "harmonics": { "count": 64, "ampScale": 1.0 },
//!              "noise": { "bands": 8, "dbRange": 60.0 },
//!              "data": "<base64>" } } ] } }
//! ```
//!
//! [`SpectralData::from_json`] validates the container in a fixed order so
//! that error messages name the first thing that is wrong, extracts the codec
//! parameters (applying defaults for missing optional keys), and keeps the
//! base64 payload for [`SpectralData::decode_payload`]. Unknown keys are
//! ignored everywhere.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};
use serde::Deserialize;

use crate::error::{DocResult, DocumentError};

/// The only supported schema tag.
pub const SCHEMA_WTGEN_1: &str = "wtgen-1";

/// The only supported node operation.
pub const OP_SPECTRAL_DATA: &str = "spectralData";

/// The only supported payload codec.
pub const CODEC_FRAMEPACK_V1: &str = "harm-noise-framepack-v1";

/// Default harmonic amplitude scale.
pub const DEFAULT_AMP_SCALE: f32 = 1.0;

/// Default noise dynamic range in dB.
pub const DEFAULT_NOISE_DB_RANGE: f32 = 60.0;

/// Default noise quantization range in dB.
pub const DEFAULT_NOISE_QUANT_DB: f32 = 120.0;

/// Standard alphabet; padding is accepted but not required.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An explicit noise banding range: bins `[lo_bin, hi_bin)` carry band energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandRange {
    /// First bin of the banded region (inclusive).
    pub lo_bin: usize,
    /// One past the last bin of the banded region (exclusive).
    pub hi_bin: usize,
}

/// Codec parameters extracted from a document, with defaults applied.
///
/// `table_size`, `frames`, `harmonic_count` and `noise_bands` are hints: the
/// framepack header is authoritative, and the decoder cross-checks the first
/// two against it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecParams {
    /// Declared samples per frame, if the document carries one.
    pub table_size: Option<usize>,
    /// Declared frame count, if the document carries one.
    pub frames: Option<usize>,
    /// Declared harmonics per frame.
    pub harmonic_count: Option<usize>,
    /// Linear scale applied to dequantized harmonic amplitudes.
    pub amp_scale: f32,
    /// Declared noise bands per frame.
    pub noise_bands: Option<usize>,
    /// Noise dynamic range in dB (informational for the half-dB decode path).
    pub noise_db_range: f32,
    /// Noise quantization range in dB (informational).
    pub noise_quant_db: f32,
    /// Explicit banding range; when absent the decoder derives one.
    pub banding: Option<BandRange>,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            table_size: None,
            frames: None,
            harmonic_count: None,
            amp_scale: DEFAULT_AMP_SCALE,
            noise_bands: None,
            noise_db_range: DEFAULT_NOISE_DB_RANGE,
            noise_quant_db: DEFAULT_NOISE_QUANT_DB,
            banding: None,
        }
    }
}

/// A validated spectralData node: codec parameters plus the base64 payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralData {
    /// Extracted codec parameters.
    pub params: CodecParams,
    data: String,
}

// Permissive mirror of the container. Every field is optional so that the
// ordered checks below, not serde, decide which reason the caller sees.
#[derive(Debug, Deserialize)]
struct RawDocument {
    schema: Option<String>,
    program: Option<RawProgram>,
}

#[derive(Debug, Deserialize)]
struct RawProgram {
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    op: Option<String>,
    p: Option<RawNodeParams>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeParams {
    codec: Option<String>,
    table_size: Option<u32>,
    frames: Option<u32>,
    harmonics: Option<RawHarmonics>,
    noise: Option<RawNoise>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHarmonics {
    count: Option<u32>,
    amp_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNoise {
    bands: Option<u32>,
    db_range: Option<f32>,
    quant_db: Option<f32>,
    banding: Option<RawBanding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBanding {
    lo_bin: Option<u32>,
    hi_bin: Option<u32>,
}

impl SpectralData {
    /// Parses and validates a wtgen-1 document.
    ///
    /// Checks run in a fixed order: top-level object, `schema`,
    /// `program.nodes[0].op`, `nodes[0].p.codec`, `nodes[0].p.data`. The first
    /// violation is reported as a [`DocumentError::Schema`] naming it.
    pub fn from_json(text: &str) -> DocResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(DocumentError::schema("root is not an object"));
        }

        let raw: RawDocument = serde_json::from_value(value)
            .map_err(|e| DocumentError::schema(format!("malformed document: {e}")))?;

        match raw.schema.as_deref() {
            Some(SCHEMA_WTGEN_1) => {}
            Some(other) => {
                return Err(DocumentError::schema(format!(
                    "unsupported schema {other:?} (expected \"{SCHEMA_WTGEN_1}\")"
                )))
            }
            None => return Err(DocumentError::schema("missing schema")),
        }

        let program = raw
            .program
            .ok_or_else(|| DocumentError::schema("missing program"))?;
        let node = program
            .nodes
            .into_iter()
            .next()
            .ok_or_else(|| DocumentError::schema("program.nodes is empty"))?;

        match node.op.as_deref() {
            Some(OP_SPECTRAL_DATA) => {}
            Some(other) => {
                return Err(DocumentError::schema(format!(
                    "unsupported op {other:?} (expected \"{OP_SPECTRAL_DATA}\")"
                )))
            }
            None => return Err(DocumentError::schema("missing nodes[0].op")),
        }

        let p = node
            .p
            .ok_or_else(|| DocumentError::schema("missing nodes[0].p"))?;

        match p.codec.as_deref() {
            Some(CODEC_FRAMEPACK_V1) => {}
            Some(other) => {
                return Err(DocumentError::schema(format!(
                    "unsupported codec {other:?} (expected \"{CODEC_FRAMEPACK_V1}\")"
                )))
            }
            None => return Err(DocumentError::schema("missing nodes[0].p.codec")),
        }

        let data = match p.data {
            Some(d) if !d.is_empty() => d,
            _ => return Err(DocumentError::schema("missing nodes[0].p.data")),
        };

        let mut params = CodecParams {
            table_size: p.table_size.map(|v| v as usize),
            frames: p.frames.map(|v| v as usize),
            ..CodecParams::default()
        };

        if let Some(h) = p.harmonics {
            params.harmonic_count = h.count.map(|v| v as usize);
            if let Some(scale) = h.amp_scale {
                params.amp_scale = scale;
            }
        }

        if let Some(n) = p.noise {
            params.noise_bands = n.bands.map(|v| v as usize);
            if let Some(range) = n.db_range {
                params.noise_db_range = range;
            }
            if let Some(quant) = n.quant_db {
                params.noise_quant_db = quant;
            }
            if let Some(banding) = n.banding {
                if let (Some(lo), Some(hi)) = (banding.lo_bin, banding.hi_bin) {
                    params.banding = Some(BandRange {
                        lo_bin: lo as usize,
                        hi_bin: hi as usize,
                    });
                }
            }
        }

        Ok(Self { params, data })
    }

    /// Returns the raw base64 payload string.
    pub fn payload_base64(&self) -> &str {
        &self.data
    }

    /// Decodes the base64 payload into bytes, refusing anything that would
    /// expand past `max_bytes`.
    pub fn decode_payload(&self, max_bytes: usize) -> DocResult<Vec<u8>> {
        // 4 base64 characters decode to at most 3 bytes; bound the allocation
        // before touching the payload.
        let upper_bound = self.data.len() / 4 * 3 + 3;
        if upper_bound > max_bytes {
            return Err(DocumentError::PayloadTooLarge { limit: max_bytes });
        }

        let bytes = PAYLOAD_ENGINE.decode(self.data.as_bytes())?;
        if bytes.len() > max_bytes {
            return Err(DocumentError::PayloadTooLarge { limit: max_bytes });
        }
        Ok(bytes)
    }
}
