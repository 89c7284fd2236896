// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
mod test_end_to_end {
    use segmap::config::{load_config, SegmapConfig};
    use segmap::prelude::*;
    use segmap::structures::class_name;
    use std::fs;
    use std::time::{Duration, Instant};

    fn classifier_output() -> Vec<ClassObservation> {
        vec![
            ClassObservation::new("person", 0.56),
            ClassObservation::new("bicycle", 0.31),
            ClassObservation::new("dog", 0.13),
        ]
    }

    #[test]
    fn test_frame_from_segmentation_model() {
        let postprocessor = SegmentationPostprocessor::default();
        // 3 x 3 x 1, with values outside 0..29 from a misbehaving model
        let tensor = RawTensor::new(
            vec![3, 3, 1],
            vec![1, 1, 18, -28, 0, 18, 30, 57, 2_147_483_647],
        );
        let grid = postprocessor.decode(&tensor).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(
            grid.to_rows(),
            vec![vec![1, 1, 18], vec![1, 0, 18], vec![1, 28, 7]]
        );
        assert_eq!(class_name(grid.get(0, 2).unwrap() as usize), Some("dog"));
        assert!(grid.as_array().iter().all(|&c| (c as usize) < NUM_CLASSES));
    }

    #[test]
    fn test_summary_from_classifier_output() {
        let summary = SegmentationPostprocessor::default().normalize(&classifier_output());
        assert_eq!(summary.total(), 100);
        assert_eq!(summary.percentage_of("person"), Some(56));
        assert_eq!(summary.percentage_of("bicycle"), Some(31));
        assert_eq!(summary.percentage_of("dog"), Some(13));
        assert_eq!(summary.to_string(), "person (56%)\nbicycle (31%)\ndog (13%)");
    }

    #[test]
    fn test_three_way_tie_credits_first_entry() {
        let summary = normalize_percentages(&[
            ClassObservation::new("cat", 0.333),
            ClassObservation::new("dog", 0.333),
            ClassObservation::new("bird", 0.333),
        ]);
        let values: Vec<i32> = summary.iter().map(|e| e.percentage).collect();
        assert_eq!(values, vec![34, 33, 33]);
    }

    #[test]
    fn test_rounded_tie_credits_larger_confidence() {
        let summary = normalize_percentages(&[
            ClassObservation::new("cat", 0.333),
            ClassObservation::new("dog", 0.333),
            ClassObservation::new("bird", 0.334),
        ]);
        let values: Vec<i32> = summary.iter().map(|e| e.percentage).collect();
        assert_eq!(values, vec![33, 33, 34]);
        assert_eq!(summary.to_string(), "cat (33%)\ndog (33%)\nbird (34%)");
    }

    #[test]
    fn test_rounding_mode_changes_only_ties() {
        let observations = [
            ClassObservation::new("a", 0.125),
            ClassObservation::new("b", 0.625),
            ClassObservation::new("c", 0.25),
        ];
        let away = ConfidenceNormalizer::new().normalize(&observations);
        let even = ConfidenceNormalizer::with_rounding(RoundingMode::HalfToEven).normalize(&observations);

        // 12.5 -> 13 vs 12, 62.5 -> 63 vs 62; the remainder lands on "b"
        assert_eq!(away.percentage_of("a"), Some(13));
        assert_eq!(away.percentage_of("b"), Some(62));
        assert_eq!(even.percentage_of("a"), Some(12));
        assert_eq!(even.percentage_of("b"), Some(63));
        assert_eq!(away.total(), 100);
        assert_eq!(even.total(), 100);
    }

    #[test]
    fn test_config_file_drives_postprocessor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segmap.toml");
        fs::write(
            &path,
            r#"
[analysis]
min_interval_ms = 250

[decoding]
class_count = 4

[normalization]
rounding = "half_to_even"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path), None).unwrap();
        let postprocessor = SegmentationPostprocessor::from_config(&config).unwrap();
        assert_eq!(postprocessor.decoder().class_count(), 4);
        assert_eq!(postprocessor.normalizer().rounding(), RoundingMode::HalfToEven);

        let grid = postprocessor
            .decode(&RawTensor::new(vec![2, 2], vec![3, 4, 5, -1]))
            .unwrap();
        assert_eq!(grid.to_rows(), vec![vec![3, 0], vec![1, 3]]);

        let gate = SegmentationPostprocessor::analysis_gate(&config);
        assert_eq!(gate.min_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_gated_frame_loop() {
        let config = SegmapConfig::default();
        let postprocessor = SegmentationPostprocessor::from_config(&config).unwrap();
        let gate = SegmentationPostprocessor::analysis_gate(&config);
        let tensor = RawTensor::new(vec![2, 2], vec![0, 1, 2, 3]);

        let start = Instant::now();
        let mut analyzed = 0;
        // 30 fps for one second
        for frame in 0..30u64 {
            let now = start + Duration::from_millis(frame * 33);
            if let Some(_permit) = gate.try_begin(now) {
                postprocessor.decode(&tensor).unwrap();
                analyzed += 1;
            }
        }

        // admitted at 0 ms and at the first frame strictly past 500 ms
        assert_eq!(analyzed, 2);
        assert_eq!(gate.dropped_frames(), 28);
    }

    #[test]
    fn test_malformed_tensors_are_rejected() {
        let postprocessor = SegmentationPostprocessor::default();
        let too_short = RawTensor::new(vec![4, 4, 1], vec![0; 15]);
        let err = postprocessor.decode(&too_short).unwrap_err();
        assert!(matches!(
            err,
            SegmapDataError::BufferUnderrun {
                required: 16,
                available: 15
            }
        ));

        let flat = RawTensor::new(vec![16], vec![0; 16]);
        assert!(postprocessor.decode(&flat).unwrap_err().is_shape_error());
    }
}

#[cfg(test)]
mod test_concurrent_use {
    use rayon::prelude::*;
    use segmap::prelude::*;

    #[test]
    fn test_shared_postprocessor_across_threads() {
        let postprocessor = SegmentationPostprocessor::default();
        let tensor = RawTensor::new(vec![8, 8], (0..64).map(|v| v * 7 - 200).collect());
        let expected = postprocessor.decode(&tensor).unwrap();

        let grids: Vec<ClassGrid> = (0..32)
            .into_par_iter()
            .map(|_| postprocessor.decode(&tensor).unwrap())
            .collect();
        assert!(grids.iter().all(|grid| *grid == expected));

        let summaries: Vec<PercentageDistribution> = (0..32)
            .into_par_iter()
            .map(|i| {
                postprocessor.normalize(&[
                    ClassObservation::new("cat", 0.5),
                    ClassObservation::new("dog", (i as f32) / 100.0),
                ])
            })
            .collect();
        assert!(summaries.iter().all(|summary| summary.total() == 100));
    }
}
