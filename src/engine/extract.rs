//! Range extraction
//!
//! Cuts a time range out of a [`SampleBuffer`] and returns it as a new,
//! independent buffer. User-entered bounds are clamped to the audio before
//! they are checked, so only empty or inverted ranges are rejected.

use std::ops::Range;

use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, WavTrimError};

/// Resolve a time range in seconds to a half-open range of frame indices
///
/// `start_secs` is clamped below at 0 and `end_secs` above at the buffer
/// duration. Indices are `floor(seconds * sample_rate)`, clamped into
/// `[0, frame_count]`. An end bound that reaches the duration always maps to
/// `frame_count`.
///
/// # Errors
/// * `InvalidRange` - if either bound is NaN, or the clamped end is not
///   strictly after the clamped start
pub fn sample_range(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> Result<Range<usize>> {
    let duration_secs = buffer.duration_secs();
    let invalid = || WavTrimError::InvalidRange {
        start_secs,
        end_secs,
        duration_secs,
    };

    if start_secs.is_nan() || end_secs.is_nan() {
        return Err(invalid());
    }

    let effective_start = start_secs.max(0.0);
    let effective_end = end_secs.min(duration_secs);

    if effective_end <= effective_start {
        return Err(invalid());
    }

    let frame_count = buffer.frame_count();
    let rate = buffer.sample_rate() as f64;

    let start_sample = ((effective_start * rate).floor() as usize).min(frame_count);
    let end_sample = if effective_end >= duration_secs {
        frame_count
    } else {
        ((effective_end * rate).floor() as usize).min(frame_count)
    };

    Ok(start_sample..end_sample.max(start_sample))
}

/// Extract `[start_secs, end_secs)` from `buffer` into a new buffer
///
/// The result keeps the sample rate and channel count of the input. Each
/// channel is copied, so the input stays untouched and can be trimmed again
/// with different bounds.
///
/// # Errors
/// * `InvalidRange` - see [`sample_range`]
///
/// # Example
/// ```
/// use wavtrim::engine::{extract, SampleBuffer};
///
/// let buffer = SampleBuffer::silence(2, 44100 * 10, 44100).unwrap();
/// let clip = extract(&buffer, 2.0, 5.0).unwrap();
/// assert_eq!(clip.frame_count(), 44100 * 3);
/// assert!(extract(&buffer, 5.0, 5.0).is_err());
/// ```
pub fn extract(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> Result<SampleBuffer> {
    let range = sample_range(buffer, start_secs, end_secs)?;

    debug!(
        "Extracting frames {}..{} of {} ({:.3}s to {:.3}s, {} Hz, {} ch)",
        range.start,
        range.end,
        buffer.frame_count(),
        start_secs,
        end_secs,
        buffer.sample_rate(),
        buffer.channel_count()
    );

    let channels = buffer
        .channels()
        .iter()
        .map(|channel| channel[range.clone()].to_vec())
        .collect();

    SampleBuffer::new(channels, buffer.sample_rate())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// 10 seconds at 100 Hz, stereo, each sample encodes its own position
    fn ramp_buffer() -> SampleBuffer {
        let left: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        SampleBuffer::new(vec![left, right], 100).unwrap()
    }

    #[test]
    fn test_extract_middle() {
        let buffer = ramp_buffer();
        let clip = extract(&buffer, 2.0, 5.0).unwrap();

        assert_eq!(clip.frame_count(), 300);
        assert_eq!(clip.sample_rate(), 100);
        assert_eq!(clip.channel_count(), 2);
        assert_eq!(clip.channel(0), &buffer.channel(0)[200..500]);
        assert_eq!(clip.channel(1), &buffer.channel(1)[200..500]);
    }

    #[test]
    fn test_extract_full_range_is_identity() {
        let buffer = ramp_buffer();
        let clip = extract(&buffer, 0.0, buffer.duration_secs()).unwrap();
        assert_eq!(clip, buffer);
    }

    #[test]
    fn test_extract_clamps_bounds() {
        let buffer = ramp_buffer();
        let clip = extract(&buffer, -3.0, 42.0).unwrap();
        assert_eq!(clip, buffer);

        let tail = extract(&buffer, 9.5, f64::INFINITY).unwrap();
        assert_eq!(tail.frame_count(), 50);
        assert_eq!(tail.channel(0), &buffer.channel(0)[950..]);
    }

    #[test]
    fn test_extract_floors_indices() {
        let buffer = ramp_buffer();
        // 123.4 -> 123, 200.9 -> 200
        let range = sample_range(&buffer, 1.234, 2.009).unwrap();
        assert_eq!(range, 123..200);
    }

    #[test_case(5.0, 5.0 ; "zero length")]
    #[test_case(5.0, 3.0 ; "inverted")]
    #[test_case(12.0, 15.0 ; "entirely past the end")]
    #[test_case(-5.0, -1.0 ; "entirely before the start")]
    #[test_case(f64::NAN, 3.0 ; "nan start")]
    #[test_case(1.0, f64::NAN ; "nan end")]
    fn test_extract_rejects_range(start: f64, end: f64) {
        let buffer = ramp_buffer();
        match extract(&buffer, start, end) {
            Err(WavTrimError::InvalidRange { duration_secs, .. }) => {
                assert_eq!(duration_secs, 10.0);
            }
            other => panic!("Expected InvalidRange, got: {:?}", other),
        }
    }

    #[test]
    fn test_extract_sub_sample_range_is_empty_buffer() {
        let buffer = ramp_buffer();
        // Valid in seconds, but shorter than one frame at 100 Hz
        let clip = extract(&buffer, 1.001, 1.002).unwrap();
        assert!(clip.is_empty());
        assert_eq!(clip.channel_count(), 2);
    }

    #[test]
    fn test_extract_does_not_alias_input() {
        let buffer = ramp_buffer();
        let clip = extract(&buffer, 0.0, 1.0).unwrap();

        let mut channels = clip.into_channels();
        channels[0][0] = 99.0;

        assert_eq!(buffer.channel(0)[0], 0.0);
        // Source can be trimmed again with other bounds
        let again = extract(&buffer, 0.0, 1.0).unwrap();
        assert_eq!(again.channel(0)[0], 0.0);
    }

    #[test]
    fn test_extract_from_empty_buffer_fails() {
        let buffer = SampleBuffer::silence(1, 0, 44100).unwrap();
        assert!(matches!(
            extract(&buffer, 0.0, 1.0),
            Err(WavTrimError::InvalidRange { .. })
        ));
    }
}
