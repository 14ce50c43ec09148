//! Property-based tests over arbitrary input signals

mod common;

use common::{gaps, trace};
use pantompkins_core::{detect, detect_into, DefaultDetector, DetectorConfig, Sample};
use proptest::prelude::*;

const DELAY: u64 = 22;
const REFRACTORY: u64 = 50;

fn signal() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(-500i32..500, 0..1500)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_decision_per_sample(samples in signal()) {
        let output = detect(&samples, DetectorConfig::default()).unwrap();
        prop_assert_eq!(output.len(), samples.len());
    }

    #[test]
    fn marks_follow_beats_by_the_output_delay(samples in signal()) {
        let run = trace(&samples);
        let expected: Vec<u64> = run
            .beat_indices()
            .into_iter()
            .filter(|&index| index >= DELAY)
            .map(|index| index - DELAY)
            .collect();
        prop_assert_eq!(run.marked_outputs(), expected);
    }

    #[test]
    fn beats_respect_the_refractory_period(samples in signal()) {
        let run = trace(&samples);
        for gap in gaps(&run.beat_indices()) {
            prop_assert!(gap >= REFRACTORY, "beats {} apart", gap);
        }
    }

    #[test]
    fn secondary_thresholds_stay_at_half(samples in signal()) {
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();
        for &sample in &samples {
            detector.process(sample, &mut output).unwrap();
            let thresholds = detector.thresholds();
            prop_assert_eq!(thresholds.integrated.secondary, 0.5 * thresholds.integrated.primary);
            prop_assert_eq!(thresholds.filtered.secondary, 0.5 * thresholds.filtered.primary);
        }
    }

    #[test]
    fn rr_bounds_stay_ordered(samples in signal()) {
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();
        for &sample in &samples {
            detector.process(sample, &mut output).unwrap();
        }
        let rr = detector.rr_state();
        prop_assert!(rr.low <= rr.average_normal);
        prop_assert!(rr.average_normal <= rr.high);
        prop_assert!(rr.high <= rr.miss);
    }

    #[test]
    fn fixed_capacity_output_matches(samples in signal()) {
        let mut fixed = heapless::Vec::<bool, 1500>::new();
        detect_into::<600, 1500>(&samples, DetectorConfig::default(), &mut fixed).unwrap();

        let output = detect(&samples, DetectorConfig::default()).unwrap();
        prop_assert_eq!(fixed.as_slice(), output.as_slice());
    }

    #[test]
    fn detection_is_deterministic(samples in signal()) {
        let first = trace(&samples);
        let second = trace(&samples);
        prop_assert_eq!(first, second);
    }
}
