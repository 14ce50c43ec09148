//! Example 02: Replaying a Recording
//!
//! Replays a text recording (one integer sample per line) through the
//! detector the way the firmware does: under a 2-second run timer, stopping
//! early at the "no more samples" sentinel.
//!
//! Usage: cargo run --example 02_file_replay --features stream-file -- record.txt

use pantompkins_core::{
    pipeline::{run, StopSignal},
    stream::{adapters::DEFAULT_RUN_TIMEOUT_MS, FileStream, SentinelStream, StreamError, TimeoutStream},
    time::MonotonicTime,
    DefaultDetector, DetectorConfig, RunError,
};

fn main() -> Result<(), RunError<std::io::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: 02_file_replay <recording.txt>");
        return Ok(());
    };

    let config = DetectorConfig::default();
    let mut detector = DefaultDetector::new(config)?;

    let clock = MonotonicTime::new();
    let file = FileStream::open(&path).map_err(RunError::Stream)?;
    let source = TimeoutStream::new(
        SentinelStream::new(file, config.sentinel),
        DEFAULT_RUN_TIMEOUT_MS,
        &clock,
    );

    let stop = StopSignal::new();
    let mut output: Vec<bool> = Vec::new();
    let summary = match run(&mut detector, source, &stop, &mut output) {
        Ok(summary) => summary,
        Err(RunError::Stream(StreamError::Format(reason))) => {
            eprintln!("{}: {}", path, reason);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for beat in output {
        println!("{}", beat as u8);
    }
    eprintln!(
        "{} samples, {} beats, {} outputs",
        summary.samples_processed, summary.beats_detected, summary.outputs_written
    );

    Ok(())
}
