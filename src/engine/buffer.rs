//! Sample Buffer
//!
//! The in-memory form of decoded audio shared by the extractor and the
//! encoder. Samples are stored non-interleaved as 32-bit floats, one
//! `Vec<f32>` per channel.
//!
//! A buffer is validated once, when it is built, and cannot be mutated
//! afterwards. Every other component may therefore rely on the invariants
//! without re-checking them.

use crate::error::{Result, WavTrimError};

/// Largest channel count a RIFF `fmt ` chunk can describe
pub const MAX_CHANNELS: usize = u16::MAX as usize;

// ============================================================================
// Channel Layout
// ============================================================================

/// Common channel configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    Stereo,
    /// Any other channel count
    Multi(usize),
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
            ChannelLayout::Multi(n) => *n,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Self {
        match count {
            1 => ChannelLayout::Mono,
            2 => ChannelLayout::Stereo,
            n => ChannelLayout::Multi(n),
        }
    }

    /// Short human-readable name ("mono", "stereo", "6ch")
    pub fn name(&self) -> String {
        match self {
            ChannelLayout::Mono => "mono".to_string(),
            ChannelLayout::Stereo => "stereo".to_string(),
            ChannelLayout::Multi(n) => format!("{}ch", n),
        }
    }
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Decoded multi-channel audio
///
/// # Invariants
/// - `sample_rate > 0`
/// - at least one channel, at most [`MAX_CHANNELS`]
/// - every channel holds exactly `frame_count()` samples
///
/// Samples may lie outside `[-1.0, 1.0]`; they are clamped when encoded,
/// never on construction.
///
/// # Example
/// ```
/// use wavtrim::engine::SampleBuffer;
///
/// let buffer = SampleBuffer::new(vec![vec![0.0; 44100], vec![0.0; 44100]], 44100).unwrap();
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frame_count(), 44100);
/// assert_eq!(buffer.duration_secs(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors
    ///
    /// # Errors
    /// * `InvariantViolation` - zero sample rate, no channels, too many
    ///   channels, or channels of differing length
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(WavTrimError::invariant("sample rate must be positive"));
        }
        if channels.is_empty() {
            return Err(WavTrimError::invariant("buffer must have at least one channel"));
        }
        if channels.len() > MAX_CHANNELS {
            return Err(WavTrimError::invariant(format!(
                "{} channels exceeds the maximum of {}",
                channels.len(),
                MAX_CHANNELS
            )));
        }

        let frame_count = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frame_count)
        {
            return Err(WavTrimError::invariant(format!(
                "channel {} has {} samples, expected {}",
                index,
                channel.len(),
                frame_count
            )));
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a buffer of silence
    pub fn silence(num_channels: usize, num_frames: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0_f32; num_frames]; num_channels], sample_rate)
    }

    /// Create a buffer from interleaved sample data
    ///
    /// # Arguments
    /// * `interleaved` - Interleaved sample data (L, R, L, R, ... for stereo)
    /// * `num_channels` - Number of channels in the data
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    /// * `InvariantViolation` - if the data length is not a whole number of
    ///   frames, or any constructor invariant fails
    pub fn from_interleaved(interleaved: &[f32], num_channels: usize, sample_rate: u32) -> Result<Self> {
        if num_channels == 0 {
            return Err(WavTrimError::invariant("buffer must have at least one channel"));
        }

        if interleaved.len() % num_channels != 0 {
            return Err(WavTrimError::invariant(format!(
                "interleaved data length {} is not divisible by channel count {}",
                interleaved.len(),
                num_channels
            )));
        }

        let num_frames = interleaved.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(num_frames); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }

        Self::new(channels, sample_rate)
    }

    /// Convert the buffer to interleaved, frame-major order
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channel_count() * self.frame_count());

        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                interleaved.push(channel[frame]);
            }
        }

        interleaved
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// True when the buffer holds zero frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Duration in seconds (`frame_count / sample_rate`)
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Channel layout derived from the channel count
    pub fn channel_layout(&self) -> ChannelLayout {
        ChannelLayout::from_count(self.channel_count())
    }

    /// Samples of one channel
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels, in order
    #[inline]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Get a sample, or None if either index is out of bounds
    #[inline]
    pub fn get_sample(&self, channel: usize, frame: usize) -> Option<f32> {
        self.channels
            .get(channel)
            .and_then(|ch| ch.get(frame).copied())
    }

    /// Consume the buffer and return its channel vectors
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Check whether two buffers match in shape and agree sample-by-sample
    /// within `tolerance`
    pub fn is_approx_equal(&self, other: &SampleBuffer, tolerance: f32) -> bool {
        self.sample_rate == other.sample_rate
            && self.channel_count() == other.channel_count()
            && self.frame_count() == other.frame_count()
            && self
                .channels
                .iter()
                .zip(&other.channels)
                .all(|(a, b)| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance))
    }
}

// ============================================================================
// Tests
// ============================================================================
