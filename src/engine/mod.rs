//! Audio Engine Module
//!
//! The trimming and encoding core:
//! - Sample buffer type with its construction-time invariants
//! - Time-range extraction
//! - Canonical 16-bit PCM WAV encoding
//! - File I/O at the decoder boundary

pub mod buffer;
pub mod extract;
pub mod io;
pub mod wav;

pub use buffer::{ChannelLayout, SampleBuffer, MAX_CHANNELS};
pub use extract::{extract, sample_range};
pub use io::{
    decode_wav, decode_wav_file, sha256_hex, sine_wave, write_wav_file, AudioInfo, ExportReport,
};
pub use wav::{
    dequantize_sample, encode, quantize_sample, write_wav, WavHeader, WAV_EXTENSION,
    WAV_HEADER_LEN, WAV_MIME_TYPE,
};
