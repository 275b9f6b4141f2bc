//! Audio file I/O for Wavtrim
//!
//! The decoder side reads any PCM or float WAV that `hound` understands and
//! turns it into a [`SampleBuffer`]. The writer side always goes through the
//! canonical 16-bit encoder in [`crate::engine::wav`].
//!
//! No resampling or channel mixing happens here: the buffer keeps the
//! source's sample rate and channel count.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, info, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::engine::buffer::SampleBuffer;
use crate::engine::wav::{dequantize_sample, encode, WAV_MIME_TYPE};
use crate::error::{Result, WavTrimError};

/// Summary of a decoded buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: usize,
    /// "mono", "stereo" or "<n>ch"
    pub layout: String,
    /// Samples per channel
    pub frame_count: usize,
    /// Duration in seconds
    pub duration_secs: f64,
}

impl AudioInfo {
    /// Describe a buffer
    pub fn of(buffer: &SampleBuffer) -> Self {
        Self {
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count(),
            layout: buffer.channel_layout().name(),
            frame_count: buffer.frame_count(),
            duration_secs: buffer.duration_secs(),
        }
    }
}

/// What was written by [`write_wav_file`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    /// Destination path
    pub path: String,
    /// MIME type of the written file
    pub mime_type: String,
    /// File length in bytes
    pub bytes: usize,
    /// SHA-256 of the file contents, lowercase hex
    pub sha256: String,
    /// Format of the exported audio
    pub audio: AudioInfo,
}

/// Decode WAV data from any reader into a [`SampleBuffer`]
///
/// 16-bit samples are mapped with [`dequantize_sample`], so a file written by
/// [`encode`] re-encodes to identical bytes. Other integer depths are scaled
/// by `2^(bits-1)`; float samples are taken as-is.
///
/// # Errors
/// * `InvalidAudio` - if the header or sample data cannot be parsed
/// * `UnsupportedFormat` - for bit depths `hound` reads but this crate does not map
pub fn decode_wav<R: Read>(reader: R) -> Result<SampleBuffer> {
    let reader = WavReader::new(reader).map_err(|e| WavTrimError::InvalidAudio {
        reason: format!("Failed to parse WAV header: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(WavTrimError::InvalidAudio {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let mut samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    let partial = samples.len() % channels;
    if partial != 0 {
        warn!(
            "Dropping {} trailing sample(s) that do not form a whole frame",
            partial
        );
        samples.truncate(samples.len() - partial);
    }

    debug!(
        "Decoded {} frames x {} ch @ {} Hz ({}-bit {:?})",
        samples.len() / channels,
        channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    SampleBuffer::from_interleaved(&samples, channels, spec.sample_rate)
}

/// Decode a WAV file from disk
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * anything [`decode_wav`] returns
pub fn decode_wav_file(path: &Path) -> Result<SampleBuffer> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WavTrimError::FileNotFound {
            path: path.display().to_string(),
            source: Some(e),
        },
        _ => WavTrimError::Io(e),
    })?;

    info!("Decoding {}", path.display());
    decode_wav(BufReader::new(file))
}

/// Encode a buffer and write it to `path`
///
/// The whole file is encoded in memory first, so an encoding failure never
/// leaves a partial file behind.
pub fn write_wav_file(buffer: &SampleBuffer, path: &Path) -> Result<ExportReport> {
    let bytes = encode(buffer)?;
    std::fs::write(path, &bytes)?;

    info!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(ExportReport {
        path: path.display().to_string(),
        mime_type: WAV_MIME_TYPE.to_string(),
        bytes: bytes.len(),
        sha256: sha256_hex(&bytes),
        audio: AudioInfo::of(buffer),
    })
}

/// SHA-256 of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Generate a sine tone, identical on every channel
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration_secs` - Duration of the tone in seconds
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Number of channels
pub fn sine_wave(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    channels: usize,
) -> Result<SampleBuffer> {
    let num_frames = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    let tone: Vec<f32> = (0..num_frames)
        .map(|i| (angular_freq * i as f32).sin())
        .collect();

    SampleBuffer::new(vec![tone; channels], sample_rate)
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, 32) => {
            return reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| WavTrimError::InvalidAudio {
                    reason: format!("Failed to read float samples: {}", e),
                    source: Some(Box::new(e)),
                });
        }
        (SampleFormat::Int, 16) => {
            return reader
                .samples::<i16>()
                .map(|s| s.map(dequantize_sample))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| WavTrimError::InvalidAudio {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                });
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (format, bits) => {
            return Err(WavTrimError::UnsupportedFormat {
                format: format!("{}-bit {:?} audio", bits, format),
            });
        }
    };

    reader
        .samples::<i32>()
        .map(|s| s.map(|v| (v as f64 / scale) as f32))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| WavTrimError::InvalidAudio {
            reason: format!("Failed to read {}-bit samples: {}", bits_per_sample, e),
            source: Some(Box::new(e)),
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::wav::WAV_HEADER_LEN;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_sine_wave() {
        let buffer = sine_wave(440.0, 0.5, 48000, 2).unwrap();

        assert_eq!(buffer.frame_count(), 24000);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.channel(0), buffer.channel(1));

        // Half a cycle in, the signal should be near zero
        let half_cycle = (48000.0 / 440.0 / 2.0) as usize;
        assert!(buffer.channel(0)[half_cycle].abs() < 0.1);
    }

    #[test]
    fn test_decode_own_encoding() {
        let original = sine_wave(1000.0, 0.1, 44100, 2).unwrap();
        let bytes = encode(&original).unwrap();
        let decoded = decode_wav(Cursor::new(bytes)).unwrap();

        assert_eq!(decoded.sample_rate(), 44100);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frame_count(), original.frame_count());
        assert!(original.is_approx_equal(&decoded, 1.0 / 32767.0 + 1e-7));
    }

    #[test]
    fn test_reencode_after_decode_is_lossless() {
        let samples = vec![1.0, 0.5, 0.25, -0.5, -1.0, 0.9, 0.0];
        let original = SampleBuffer::new(vec![samples], 44100).unwrap();
        let first = encode(&original).unwrap();

        let decoded = decode_wav(Cursor::new(first.clone())).unwrap();
        let full = crate::engine::extract(&decoded, 0.0, decoded.duration_secs()).unwrap();
        let second = encode(&full).unwrap();

        assert_eq!(first[WAV_HEADER_LEN..], second[WAV_HEADER_LEN..]);
        assert_eq!(first, second);

        // A second generation must not drift either
        let third = encode(&decode_wav(Cursor::new(second.clone())).unwrap()).unwrap();
        assert_eq!(second, third);
    }

    #[test]
    fn test_decode_24bit_int() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 96000,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for v in [0i32, 4194304, -8388608] {
                writer.write_sample(v).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.set_position(0);

        let buffer = decode_wav(cursor).unwrap();
        assert_eq!(buffer.sample_rate(), 96000);
        assert_eq!(buffer.channel(0), &[0.0, 0.5, -1.0]);
    }

    #[test]
    fn test_decode_float() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for v in [0.25f32, -0.75, 1.5, 0.0] {
                writer.write_sample(v).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.set_position(0);

        let buffer = decode_wav(cursor).unwrap();
        assert_eq!(buffer.channel(0), &[0.25, 1.5]);
        assert_eq!(buffer.channel(1), &[-0.75, 0.0]);
    }

    #[test]
    fn test_decode_header_only_is_empty_buffer() {
        let bytes = encode(&SampleBuffer::silence(1, 0, 8000).unwrap()).unwrap();
        assert_eq!(bytes.len(), WAV_HEADER_LEN);

        let buffer = decode_wav(Cursor::new(bytes)).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.sample_rate(), 8000);
    }

    #[test]
    fn test_decode_garbage_is_invalid_audio() {
        let result = decode_wav(Cursor::new(b"definitely not a wav file".to_vec()));
        assert!(matches!(result, Err(WavTrimError::InvalidAudio { .. })));
    }

    #[test]
    fn test_decode_nonexistent_file() {
        let result = decode_wav_file(Path::new("/nonexistent/path/audio.wav"));
        match result {
            Err(WavTrimError::FileNotFound { path, .. }) => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_write_wav_file_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let buffer = SampleBuffer::silence(1, 100, 8000).unwrap();
        let report = write_wav_file(&buffer, &path).unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(report.bytes, on_disk.len());
        assert_eq!(report.bytes, WAV_HEADER_LEN + 200);
        assert_eq!(report.sha256, sha256_hex(&on_disk));
        assert_eq!(report.mime_type, "audio/wav");
        assert_eq!(report.audio.frame_count, 100);

        let reloaded = decode_wav_file(&path).unwrap();
        assert_eq!(reloaded, buffer);
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
