//! Example 01: Basic Detection
//!
//! This example demonstrates how to:
//! - Build a detector with the default 250 Hz configuration
//! - Feed samples one at a time; decisions land in the output once settled
//! - Flush the tail of the output at end of input
//! - Inspect the adaptive thresholds and RR statistics afterwards

use pantompkins_core::{DefaultDetector, DetectorConfig, DetectorError, Sample};

/// Four seconds of a 75 bpm lead: a sharp R wave every 200 samples
fn synthetic_lead() -> Vec<Sample> {
    (0..1000i64)
        .map(|i| {
            let d = (i % 200 - 100) as f64;
            let r_wave = 600.0 * (-(d * d) / 18.0).exp();
            (900.0 + r_wave).round() as Sample
        })
        .collect()
}

fn main() -> Result<(), DetectorError> {
    println!("=== Pan-Tompkins Basic Detection ===\n");

    let config = DetectorConfig::default();
    let mut detector = DefaultDetector::new(config)?;
    let signal = synthetic_lead();

    let mut output: Vec<bool> = Vec::with_capacity(signal.len());
    for &sample in &signal {
        detector.process(sample, &mut output)?;
    }
    let flushed = detector.finish(&mut output)?;

    println!("Samples in:      {}", signal.len());
    println!("Decisions out:   {} ({} at finish)", output.len(), flushed);
    println!("Beats detected:  {}", detector.beats_detected());

    // Marks appear `output_delay` samples ahead of the beat
    for (index, _) in output.iter().enumerate().filter(|(_, &beat)| beat) {
        println!(
            "  beat at output {:4} (sample {})",
            index,
            index + config.output_delay
        );
    }

    let thresholds = detector.thresholds();
    println!("\nIntegrated threshold: {:.1}", thresholds.integrated.primary);
    println!("Band-pass threshold:  {:.1}", thresholds.filtered.primary);

    let rr = detector.rr_state();
    println!(
        "RR average {:.1} samples ({:.0} bpm), regular: {}",
        rr.average_all,
        60.0 * config.sample_rate_hz as f64 / rr.average_all.max(1.0),
        rr.regular
    );

    Ok(())
}
