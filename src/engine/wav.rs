//! Canonical PCM WAVE encoder
//!
//! Serializes a [`SampleBuffer`] as a 16-bit linear PCM RIFF/WAVE file with
//! the classic 44-byte header: one `fmt ` chunk, one `data` chunk, nothing
//! else. All multi-byte fields are little-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  "RIFF"
//!      4     4  total length - 8
//!      8     4  "WAVE"
//!     12     4  "fmt "
//!     16     4  16
//!     20     2  1 (PCM)
//!     22     2  channels
//!     24     4  sample rate
//!     28     4  byte rate (rate * channels * 2)
//!     32     2  block align (channels * 2)
//!     34     2  16 (bits per sample)
//!     36     4  "data"
//!     40     4  data length (frames * channels * 2)
//!     44     -  interleaved i16 samples, frame-major
//! ```

use std::io::Write;

use log::{debug, warn};

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, WavTrimError};

/// Length of the canonical header in bytes
pub const WAV_HEADER_LEN: usize = 44;

/// Bit depth of every encoded sample
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per encoded sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// MIME type of the encoder output
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// File extension of the encoder output
pub const WAV_EXTENSION: &str = "wav";

const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;

/// Quantize one float sample to signed 16-bit PCM
///
/// The sample is clamped to `[-1.0, 1.0]`, then scaled by 32768 when
/// negative and by 32767 otherwise, truncating toward zero. NaN maps to 0.
///
/// ```
/// use wavtrim::engine::quantize_sample;
///
/// assert_eq!(quantize_sample(1.0), 32767);
/// assert_eq!(quantize_sample(-1.0), -32768);
/// assert_eq!(quantize_sample(1.5), 32767);
/// ```
#[inline]
pub fn quantize_sample(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    // f64 keeps the product exact before truncation
    let s = sample.clamp(-1.0, 1.0) as f64;
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Map a 16-bit sample back to float, inverting [`quantize_sample`]
///
/// Negative values are divided by 32768 and non-negative ones by 32767, so
/// every clamped input comes back within 1/32767 of itself, and
/// `quantize_sample(dequantize_sample(q)) == q` for every `q`.
#[inline]
pub fn dequantize_sample(sample: i16) -> f32 {
    if sample < 0 {
        // Exact: the divisor is a power of two
        return sample as f32 / 32768.0;
    }
    let value = (sample as f64 / 32767.0) as f32;
    if (value as f64) * 32767.0 < sample as f64 {
        // Rounded below q / 32767; step up one ulp so truncation lands on q
        f32::from_bits(value.to_bits() + 1)
    } else {
        value
    }
}

// ============================================================================
// Header
// ============================================================================

/// The fields of a canonical 44-byte PCM header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Length of the `data` chunk payload in bytes
    pub data_len: u32,
}

impl WavHeader {
    /// Compute the header for a buffer
    ///
    /// # Errors
    /// * `InvariantViolation` - if any size field would overflow its
    ///   32-bit (or 16-bit) slot in the RIFF layout
    pub fn for_buffer(buffer: &SampleBuffer) -> Result<Self> {
        let channel_count = buffer.channel_count();
        let channels = u16::try_from(channel_count).map_err(|_| {
            WavTrimError::invariant(format!("{} channels do not fit a WAV header", channel_count))
        })?;

        if channel_count * BYTES_PER_SAMPLE > u16::MAX as usize {
            return Err(WavTrimError::invariant(format!(
                "block align for {} channels overflows 16 bits",
                channel_count
            )));
        }

        let byte_rate = buffer.sample_rate() as u64 * channel_count as u64 * BYTES_PER_SAMPLE as u64;
        if byte_rate > u32::MAX as u64 {
            return Err(WavTrimError::invariant(format!(
                "byte rate {} overflows 32 bits",
                byte_rate
            )));
        }

        let data_len = buffer.frame_count() as u64 * channel_count as u64 * BYTES_PER_SAMPLE as u64;
        let max_data_len = u32::MAX as u64 - (WAV_HEADER_LEN as u64 - 8);
        if data_len > max_data_len {
            return Err(WavTrimError::invariant(format!(
                "{} bytes of sample data exceed the 4 GiB RIFF limit",
                data_len
            )));
        }

        Ok(Self {
            channels,
            sample_rate: buffer.sample_rate(),
            data_len: data_len as u32,
        })
    }

    /// Bytes per second of audio
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Bytes per frame
    pub fn block_align(&self) -> u16 {
        self.channels * BYTES_PER_SAMPLE as u16
    }

    /// Value of the top-level RIFF size field (file length minus 8)
    pub fn riff_chunk_len(&self) -> u32 {
        self.data_len + (WAV_HEADER_LEN as u32 - 8)
    }

    /// Total file length in bytes
    pub fn total_len(&self) -> usize {
        WAV_HEADER_LEN + self.data_len as usize
    }

    /// Number of frames described by the data length
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data_len as usize / self.block_align() as usize
    }

    /// Serialize to the 44 header bytes
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_LEN] {
        let mut out = [0u8; WAV_HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.riff_chunk_len().to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        out[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        out[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_len.to_le_bytes());
        out
    }

    /// Parse a canonical header as produced by [`encode`]
    ///
    /// Only the exact layout this encoder writes is accepted; general WAV
    /// files with extra chunks should go through [`crate::engine::decode_wav`].
    ///
    /// # Errors
    /// * `InvalidAudio` - if the bytes are not a canonical 16-bit PCM header
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let invalid = |reason: &str| WavTrimError::InvalidAudio {
            reason: reason.to_string(),
            source: None,
        };
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        if bytes.len() < WAV_HEADER_LEN {
            return Err(invalid("shorter than a 44-byte WAV header"));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(invalid("missing RIFF/WAVE signature"));
        }
        if &bytes[12..16] != b"fmt " || u32_at(16) != FMT_CHUNK_LEN {
            return Err(invalid("fmt chunk is not a 16-byte PCM descriptor"));
        }
        if u16_at(20) != FORMAT_PCM || u16_at(34) != BITS_PER_SAMPLE {
            return Err(invalid("not 16-bit linear PCM"));
        }
        if &bytes[36..40] != b"data" {
            return Err(invalid("data chunk does not follow fmt chunk"));
        }

        let header = Self {
            channels: u16_at(22),
            sample_rate: u32_at(24),
            data_len: u32_at(40),
        };

        if header.channels == 0 || header.sample_rate == 0 {
            return Err(invalid("zero channels or zero sample rate"));
        }

        // Widened so hostile headers cannot overflow
        let block_align = header.channels as u64 * BYTES_PER_SAMPLE as u64;
        let byte_rate = header.sample_rate as u64 * block_align;
        if u32_at(28) as u64 != byte_rate || u16_at(32) as u64 != block_align {
            return Err(invalid("byte rate or block align inconsistent with format"));
        }
        if u32_at(4) as u64 != header.data_len as u64 + (WAV_HEADER_LEN as u64 - 8) {
            return Err(invalid("RIFF length inconsistent with data length"));
        }

        Ok(header)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a buffer as a complete canonical PCM WAVE file
///
/// The output is `44 + frame_count * channel_count * 2` bytes long. Samples
/// are interleaved frame-major and quantized with [`quantize_sample`].
///
/// # Errors
/// * `InvariantViolation` - only when the buffer is too large for the 32-bit
///   RIFF size fields
pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let header = WavHeader::for_buffer(buffer)?;

    let mut out = Vec::with_capacity(header.total_len());
    out.extend_from_slice(&header.to_bytes());

    for frame in 0..buffer.frame_count() {
        for channel in buffer.channels() {
            out.extend_from_slice(&quantize_sample(channel[frame]).to_le_bytes());
        }
    }

    let (clamped, nan) = count_unrepresentable(buffer);
    if clamped > 0 {
        warn!(
            "Clamped {} sample(s) outside [-1.0, 1.0] while encoding",
            clamped
        );
    }
    if nan > 0 {
        warn!("Encoded {} NaN sample(s) as silence", nan);
    }

    debug!(
        "Encoded {} frames x {} ch @ {} Hz into {} bytes",
        buffer.frame_count(),
        header.channels,
        header.sample_rate,
        out.len()
    );

    Ok(out)
}

/// Count samples the encoder has to alter: `(out_of_range, nan)`
fn count_unrepresentable(buffer: &SampleBuffer) -> (usize, usize) {
    buffer
        .channels()
        .iter()
        .flatten()
        .fold((0, 0), |(clamped, nan), &s| {
            if s.is_nan() {
                (clamped, nan + 1)
            } else if !(-1.0..=1.0).contains(&s) {
                (clamped + 1, nan)
            } else {
                (clamped, nan)
            }
        })
}

/// Encode a buffer and write it to `writer`
///
/// Nothing is written if encoding fails.
pub fn write_wav<W: Write>(buffer: &SampleBuffer, writer: &mut W) -> Result<()> {
    let bytes = encode(buffer)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
