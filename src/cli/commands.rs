//! CLI Command Implementations
//!
//! Each command decodes its input, runs the engine and reports on stdout.

use std::path::Path;

use log::{info, warn};

use crate::engine::{
    decode_wav_file, extract, write_wav_file, AudioInfo, ExportReport, WAV_EXTENSION,
};
use crate::error::Result;

/// Cut `[start, end)` out of `input` and write it to `output`.
pub fn trim(input: &Path, output: &Path, start: f64, end: f64, json: bool) -> Result<()> {
    info!(
        "Trimming {} from {:.3}s to {:.3}s",
        input.display(),
        start,
        end
    );

    warn_on_extension(output);
    let source = decode_wav_file(input)?;
    let clip = extract(&source, start, end)?;
    let report = write_wav_file(&clip, output)?;

    print_report(&report, json)
}

/// Re-encode all of `input` as canonical 16-bit PCM.
pub fn convert(input: &Path, output: &Path, json: bool) -> Result<()> {
    info!("Converting {}", input.display());
    warn_on_extension(output);

    let source = decode_wav_file(input)?;
    let report = write_wav_file(&source, output)?;

    print_report(&report, json)
}

/// Print the format of `input`.
pub fn info(input: &Path, json: bool) -> Result<()> {
    let buffer = decode_wav_file(input)?;
    let audio = AudioInfo::of(&buffer);

    if json {
        println!("{}", serde_json::to_string_pretty(&audio)?);
    } else {
        println!("File: {}", input.display());
        println!("{}", describe(&audio));
    }

    Ok(())
}

fn print_report(report: &ExportReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Exported: {} ({} bytes, {})", report.path, report.bytes, report.mime_type);
        println!("{}", describe(&report.audio));
        println!("SHA-256: {}", report.sha256);
    }
    Ok(())
}

fn warn_on_extension(output: &Path) {
    let ext = output.extension().and_then(|e| e.to_str());
    if !ext.is_some_and(|e| e.eq_ignore_ascii_case(WAV_EXTENSION)) {
        warn!(
            "Output {} does not end in .{}; it will still be a WAV file",
            output.display(),
            WAV_EXTENSION
        );
    }
}

fn describe(audio: &AudioInfo) -> String {
    format!(
        "Duration: {:.3}s | {} frames | {} @ {} Hz",
        audio.duration_secs, audio.frame_count, audio.layout, audio.sample_rate
    )
}
