//! wtgen-1 Document Container Library
//!
//! This crate provides parsing, validation, and payload extraction for
//! wtgen-1 wavetable documents. A document is a JSON object whose single
//! `spectralData` node carries codec parameters and a base64-encoded
//! framepack of harmonic amplitudes and noise-band energies.
//!
//! # Overview
//!
//! - **Ordered validation**: top-level object, `schema`, `program.nodes[0].op`,
//!   `p.codec`, `p.data` are checked in that order, and the first violation is
//!   reported with a reason naming it.
//! - **Defaults**: missing optional keys (`ampScale`, `dbRange`, `quantDb`,
//!   `banding`, …) take their documented defaults.
//! - **Bounded decoding**: the base64 payload is only decoded up to a
//!   caller-supplied byte limit.
//!
//! The binary framepack itself is decoded by the `wtgen-codec` crate; this
//! crate stops at `(params, payload bytes)`.
//!
//! # Example
//!
//! ```
//! use wtgen_doc::SpectralData;
//!
//! let json = r#"{
//!     "schema": "wtgen-1",
//!     "program": { "nodes": [ {
//!         "op": "spectralData",
//!         "p": { "codec": "harm-noise-framepack-v1", "data": "SE5GUHYx" }
//!     } ] }
//! }"#;
//!
//! let doc = SpectralData::from_json(json).unwrap();
//! let payload = doc.decode_payload(64 * 1024 * 1024).unwrap();
//! assert_eq!(&payload, b"HNFPv1");
//! ```
//!
//! # Modules
//!
//! - [`document`]: container types, validation, and payload decoding
//! - [`error`]: error types for parsing and extraction

pub mod document;
pub mod error;

// Re-export commonly used types at the crate root
pub use document::{
    BandRange, CodecParams, SpectralData, CODEC_FRAMEPACK_V1, DEFAULT_AMP_SCALE,
    DEFAULT_NOISE_DB_RANGE, DEFAULT_NOISE_QUANT_DB, OP_SPECTRAL_DATA, SCHEMA_WTGEN_1,
};
pub use error::{DocResult, DocumentError};
