//! HNFPv1 framepack decoding.
//!
//! The framepack is a little-endian binary stream: a 7-byte magic, four u16
//! header fields (`tableSize`, `frames`, `harmonics`, `noiseBands`), then one
//! uniform record per frame:
//!
//! - `harmonics` × u16 quantized harmonic amplitudes,
//! - `noiseBands` × i16 quantized noise-band levels (signed half-decibels),
//! - 3 × u16 reserved phase-lock/tilt words, consumed and discarded.
//!
//! [`FramepackDecoder`] validates the header eagerly (magic, power-of-two
//! table size, frame count, document cross-checks, total payload length) and
//! then yields dequantized [`FrameRecord`]s lazily as an iterator.

use wtgen_doc::CodecParams;

use crate::error::{CodecError, CodecResult};
use crate::reader::ByteReader;

/// Framepack magic: `"HNFPv1\0"`.
pub const MAGIC: [u8; 7] = *b"HNFPv1\0";

/// Header length in bytes: magic plus four u16 fields.
pub const HEADER_LEN: usize = 15;

/// Reserved u16 words trailing every frame record.
pub const RESERVED_WORDS: usize = 3;

/// Validated framepack header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramepackHeader {
    /// Samples per frame; a power of two, at least 2.
    pub table_size: usize,
    /// Number of frames; at least 1.
    pub frames: usize,
    /// Harmonic amplitudes per frame.
    pub harmonics: usize,
    /// Noise bands per frame.
    pub noise_bands: usize,
}

impl FramepackHeader {
    /// Byte length of one frame record.
    pub fn record_len(&self) -> usize {
        2 * self.harmonics + 2 * self.noise_bands + 2 * RESERVED_WORDS
    }
}

/// One decoded frame: dequantized harmonic amplitudes and noise-band levels.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Linear amplitude per harmonic, already scaled for half-spectrum
    /// placement.
    pub harmonics: Vec<f32>,
    /// Linear level per noise band, on the same scale as the harmonics.
    pub bands: Vec<f32>,
}

/// Streaming decoder over a framepack payload.
#[derive(Debug)]
pub struct FramepackDecoder<'a> {
    reader: ByteReader<'a>,
    header: FramepackHeader,
    amp_scale: f32,
    emitted: usize,
}

impl<'a> FramepackDecoder<'a> {
    /// Parses and validates the header, cross-checking against any
    /// `tableSize`/`frames` hints the document declared.
    pub fn new(payload: &'a [u8], params: &CodecParams) -> CodecResult<Self> {
        let mut reader = ByteReader::new(payload);

        let magic = reader.read_bytes(MAGIC.len(), "magic")?;
        if magic != MAGIC {
            return Err(CodecError::BadMagic);
        }

        let table_size = reader.read_u16_le("header")? as usize;
        let frames = reader.read_u16_le("header")? as usize;
        let harmonics = reader.read_u16_le("header")? as usize;
        let noise_bands = reader.read_u16_le("header")? as usize;

        if frames < 1 {
            return Err(CodecError::bad_header("frame count must be at least 1"));
        }
        if table_size < 2 || !table_size.is_power_of_two() {
            return Err(CodecError::bad_header(format!(
                "tableSize must be a power of two >= 2, got {table_size}"
            )));
        }

        if let Some(declared) = params.table_size {
            if declared != table_size {
                return Err(CodecError::SchemaMismatch {
                    field: "tableSize",
                    declared,
                    actual: table_size,
                });
            }
        }
        if let Some(declared) = params.frames {
            if declared != frames {
                return Err(CodecError::SchemaMismatch {
                    field: "frames",
                    declared,
                    actual: frames,
                });
            }
        }

        let header = FramepackHeader {
            table_size,
            frames,
            harmonics,
            noise_bands,
        };

        // The whole stream length is known up front; reject short payloads
        // before emitting any frame.
        let needed = frames * header.record_len();
        if reader.remaining() < needed {
            return Err(CodecError::Truncated {
                stage: "frame records",
            });
        }

        Ok(Self {
            reader,
            header,
            amp_scale: params.amp_scale,
            emitted: 0,
        })
    }

    /// The validated header.
    pub fn header(&self) -> FramepackHeader {
        self.header
    }

    // Quantized harmonics map q = 4096 to full scale, then N/2 restores the
    // full-spectrum magnitude of a half-spectrum amplitude.
    fn dequantize_harmonic(&self, q: u16) -> f32 {
        let half = (self.header.table_size / 2) as f32;
        q as f32 / 4096.0 * half * self.amp_scale
    }

    // Noise levels are signed half-decibels.
    fn dequantize_band(&self, q: i16) -> f32 {
        let half = (self.header.table_size / 2) as f32;
        let db = q as f32 * 0.5;
        10.0f32.powf(db / 20.0) * half
    }

    fn read_record(&mut self) -> CodecResult<FrameRecord> {
        let mut harmonics = Vec::with_capacity(self.header.harmonics);
        for _ in 0..self.header.harmonics {
            let q = self.reader.read_u16_le("harmonics")?;
            harmonics.push(self.dequantize_harmonic(q));
        }

        let mut bands = Vec::with_capacity(self.header.noise_bands);
        for _ in 0..self.header.noise_bands {
            let q = self.reader.read_i16_le("noise")?;
            bands.push(self.dequantize_band(q));
        }

        for _ in 0..RESERVED_WORDS {
            self.reader.read_u16_le("phase-lock")?;
        }

        Ok(FrameRecord { harmonics, bands })
    }
}

impl Iterator for FramepackDecoder<'_> {
    type Item = CodecResult<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted == self.header.frames {
            return None;
        }
        self.emitted += 1;
        match self.read_record() {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                // Fuse after an error.
                self.emitted = self.header.frames;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn push_u16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_i16(buf: &mut Vec<u8>, v: i16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Builds a payload; H and B are taken from the first frame.
    fn payload(table_size: u16, frames: &[(Vec<u16>, Vec<i16>)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        push_u16(&mut buf, table_size);
        push_u16(&mut buf, frames.len() as u16);
        push_u16(&mut buf, frames[0].0.len() as u16);
        push_u16(&mut buf, frames[0].1.len() as u16);
        for (harmonics, bands) in frames {
            for &q in harmonics {
                push_u16(&mut buf, q);
            }
            for &q in bands {
                push_i16(&mut buf, q);
            }
            for _ in 0..RESERVED_WORDS {
                push_u16(&mut buf, 0);
            }
        }
        buf
    }

    #[test]
    fn test_header_is_parsed() {
        let bytes = payload(8, &[(vec![4096, 2048, 0], vec![-120, -120])]);
        let decoder = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap();
        assert_eq!(
            decoder.header(),
            FramepackHeader {
                table_size: 8,
                frames: 1,
                harmonics: 3,
                noise_bands: 2,
            }
        );
        assert_eq!(decoder.header().record_len(), 2 * 3 + 2 * 2 + 6);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let mut bytes = payload(8, &[(vec![4096], vec![])]);
        bytes[0] = 0x00;
        let err = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap_err();
        assert!(matches!(err, CodecError::BadMagic));
    }

    #[test]
    fn test_non_power_of_two_table_size_is_rejected() {
        let bytes = payload(6, &[(vec![4096], vec![])]);
        let err = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap_err();
        assert!(matches!(err, CodecError::BadHeader { .. }));
    }

    #[test]
    fn test_zero_frames_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        push_u16(&mut bytes, 8);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 1);
        push_u16(&mut bytes, 0);
        let err = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap_err();
        assert!(matches!(err, CodecError::BadHeader { .. }));
    }

    #[test]
    fn test_document_hint_mismatch() {
        let bytes = payload(8, &[(vec![4096], vec![])]);
        let params = CodecParams {
            table_size: Some(16),
            ..CodecParams::default()
        };
        let err = FramepackDecoder::new(&bytes, &params).unwrap_err();
        assert!(matches!(
            err,
            CodecError::SchemaMismatch {
                field: "tableSize",
                declared: 16,
                actual: 8,
            }
        ));
    }

    #[test]
    fn test_matching_hints_pass() {
        let bytes = payload(8, &[(vec![4096], vec![])]);
        let params = CodecParams {
            table_size: Some(8),
            frames: Some(1),
            ..CodecParams::default()
        };
        assert!(FramepackDecoder::new(&bytes, &params).is_ok());
    }

    #[test]
    fn test_short_payload_is_truncated() {
        let mut bytes = payload(8, &[(vec![4096, 0], vec![-100])]);
        bytes.truncate(bytes.len() - 1);
        let err = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));
    }

    #[test]
    fn test_harmonic_dequant_uses_q4096_full_scale() {
        // q = 4096 is full scale: amplitude N/2 before ampScale.
        let bytes = payload(8, &[(vec![4096, 2048], vec![])]);
        let decoder = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap();
        let record = decoder.into_iter().next().unwrap().unwrap();
        assert_eq!(record.harmonics, vec![4.0, 2.0]);
    }

    #[test]
    fn test_harmonic_dequant_applies_amp_scale() {
        let bytes = payload(8, &[(vec![4096], vec![])]);
        let params = CodecParams {
            amp_scale: 0.5,
            ..CodecParams::default()
        };
        let decoder = FramepackDecoder::new(&bytes, &params).unwrap();
        let record = decoder.into_iter().next().unwrap().unwrap();
        assert_eq!(record.harmonics, vec![2.0]);
    }

    #[test]
    fn test_band_dequant_half_decibels() {
        // q = 0 -> 0 dB -> N/2; q = -120 -> -60 dB -> 1e-3 * N/2.
        let bytes = payload(8, &[(vec![], vec![0, -120])]);
        let decoder = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap();
        let record = decoder.into_iter().next().unwrap().unwrap();
        assert_eq!(record.bands[0], 4.0);
        assert!((record.bands[1] - 4.0e-3).abs() < 1.0e-6);
    }

    #[test]
    fn test_yields_every_frame() {
        let bytes = payload(
            4,
            &[
                (vec![4096], vec![-60]),
                (vec![2048], vec![-120]),
                (vec![1024], vec![-180]),
            ],
        );
        let decoder = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap();
        let records: Vec<_> = decoder.map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].harmonics, vec![2.0]);
        assert_eq!(records[1].harmonics, vec![1.0]);
        assert_eq!(records[2].harmonics, vec![0.5]);
    }

    #[test]
    fn test_trailing_reserved_words_are_consumed() {
        let bytes = payload(4, &[(vec![4096], vec![])]);
        let mut decoder = FramepackDecoder::new(&bytes, &CodecParams::default()).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        assert!(decoder.next().is_none());
        assert_eq!(decoder.reader.remaining(), 0);
    }
}
