//! Wavtrim - Audio Range Extraction and WAV Export
//!
//! Wavtrim takes decoded audio, optionally cuts out a time range, and writes
//! it as a byte-exact canonical 16-bit PCM WAV file.
//!
//! # Pipeline
//!
//! - Decode: any WAV `hound` can read becomes a [`engine::SampleBuffer`]
//! - Extract: [`engine::extract`] copies a `[start, end)` range into a new buffer
//! - Encode: [`engine::encode`] produces the 44-byte-header RIFF/WAVE bytes
//!
//! ```
//! use wavtrim::engine::{encode, extract, SampleBuffer};
//!
//! let buffer = SampleBuffer::silence(1, 44100 * 4, 44100)?;
//! let clip = extract(&buffer, 1.0, 2.5)?;
//! let bytes = encode(&clip)?;
//! assert_eq!(bytes.len(), 44 + (44100 * 3 / 2) * 2);
//! # Ok::<(), wavtrim::WavTrimError>(())
//! ```

pub mod cli;
pub mod engine;
pub mod error;

pub use error::{Result, WavTrimError};
