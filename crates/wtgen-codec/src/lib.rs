//! wtgen Wavetable Codec
//!
//! This crate decodes wtgen-1 documents into multi-frame wavetables and
//! publishes them to realtime audio readers:
//!
//! - **Framepack decoding** - the HNFPv1 binary stream of quantized harmonic
//!   amplitudes and noise-band levels
//! - **Spectrum assembly** - harmonics at integer bins plus banded noise
//!   spread over bin ranges
//! - **Minimum-phase reconstruction** - real-cepstrum method over a
//!   power-of-two complex FFT (rustfft, single precision)
//! - **Post-processing** - per-frame DC removal, global peak normalization
//! - **Slot registry** - four slots of `Arc<Wavetable>` handles behind a
//!   short-lived lock, with atomic replacement and snapshot reads
//!
//! # Concurrency
//!
//! Decoding is non-realtime work and allocates freely. Realtime readers call
//! [`SlotRegistry::snapshot`] once per processing block; the critical section
//! only clones four handles, and the wavetables behind them are immutable, so
//! rendering itself is lock-free. A handle stays valid for as long as the
//! reader holds it, even after the slot is replaced.
//!
//! # Example
//!
//! ```ignore
//! use wtgen_codec::SlotRegistry;
//!
//! let registry = SlotRegistry::new();
//! registry.load_document(0, &document_text, "lead.wtgen.json")?;
//!
//! let snapshot = registry.snapshot();
//! if let Some(wt) = &snapshot[0] {
//!     let sample = wt.lookup(morph, phase);
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`reader`] - bounds-checked little-endian byte reads
//! - [`framepack`] - HNFPv1 header and frame-record decoding
//! - [`spectrum`] - magnitude half-spectrum assembly
//! - [`minphase`] - minimum-phase time-domain reconstruction
//! - [`postprocess`] - DC removal and peak normalization
//! - [`loader`] - the document-to-wavetable pipeline
//! - [`registry`] - the four-slot publication point
//! - [`wavetable`] - the immutable decoded value
//! - [`error`] - error types and the stable kind taxonomy

pub mod error;
pub mod framepack;
pub mod loader;
pub mod minphase;
pub mod postprocess;
pub mod reader;
pub mod registry;
pub mod spectrum;
pub mod wavetable;

// Re-export main types at the crate root
pub use error::{CodecError, CodecResult, ErrorKind};
pub use framepack::{FramepackDecoder, FramepackHeader, FrameRecord};
pub use loader::{decode_wavetable, LoaderConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use registry::{SlotRegistry, SlotState, SLOT_COUNT};
pub use wavetable::Wavetable;
