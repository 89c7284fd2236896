// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tests for grid decoding and confidence normalization using the public API.
//!
//! These tests check the properties every caller relies on: bounded cells,
//! determinism, sum-to-100 and order preservation, plus safety of concurrent
//! calls against shared inputs.

use rayon::prelude::*;
use segmap_postprocessing::*;
use segmap_structures::{ClassObservation, RawTensor, SegmapDataError, NUM_CLASSES};

//region Helper Functions

/// Deterministic pseudo-random values covering negatives and large magnitudes
fn scrambled_values(count: usize, seed: u32) -> Vec<i32> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as i32
        })
        .collect()
}

fn scrambled_observations(count: usize, seed: u32) -> Vec<ClassObservation> {
    scrambled_values(count, seed)
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let confidence = (value as u32 % 1001) as f32 / 1000.0;
            ClassObservation::new(format!("class_{}", index), confidence)
        })
        .collect()
}

//endregion

#[cfg(test)]
mod test_grid_decoding {
    use super::*;

    #[test]
    fn test_every_cell_is_within_taxonomy() {
        for seed in 1..20 {
            let tensor = RawTensor::new(vec![16, 24], scrambled_values(16 * 24, seed));
            let grid = decode_class_grid(&tensor).unwrap();
            assert!(grid.as_array().iter().all(|&cell| (cell as usize) < NUM_CLASSES));
            let (_, max) = grid.value_range();
            assert!(max <= 28);
        }
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let tensor = RawTensor::new(vec![32, 32], scrambled_values(32 * 32, 7));
        let first = decode_class_grid(&tensor).unwrap();
        let second = decode_class_grid(&tensor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_cell_matches_true_modulo_of_source() {
        let values = scrambled_values(12 * 9, 3);
        let tensor = RawTensor::new(vec![12, 9], values.clone());
        let grid = decode_class_grid(&tensor).unwrap();
        for (index, value) in values.iter().enumerate() {
            let expected = (*value as i64).rem_euclid(NUM_CLASSES as i64) as u8;
            assert_eq!(grid.get(index / 9, index % 9), Some(expected));
        }
    }

    #[test]
    fn test_model_shaped_output_with_channel_dimension() {
        let tensor = RawTensor::new(vec![448, 448, 1], vec![17; 448 * 448]);
        let grid = decode_class_grid(&tensor).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (448, 448));
        assert_eq!(grid.unique_classes(), vec![17]);
        assert_eq!(grid.class_histogram()[17], 448 * 448);
    }

    #[test]
    fn test_underrun_from_little_endian_bytes() {
        let bytes: Vec<u8> = (0..50i32).flat_map(|v| v.to_le_bytes()).collect();
        let tensor = RawTensor::from_le_bytes(vec![10, 10], &bytes).unwrap();
        assert!(matches!(
            decode_class_grid(&tensor),
            Err(SegmapDataError::BufferUnderrun {
                required: 100,
                available: 50
            })
        ));
    }

    #[test]
    fn test_concurrent_decodes_share_a_tensor() {
        let tensor = RawTensor::new(vec![64, 64], scrambled_values(64 * 64, 11));
        let expected = decode_class_grid(&tensor).unwrap();
        let decoder = GridDecoder::new();
        let grids: Vec<_> = (0..32)
            .into_par_iter()
            .map(|_| decoder.decode(&tensor).unwrap())
            .collect();
        assert!(grids.iter().all(|grid| *grid == expected));
    }
}

#[cfg(test)]
mod test_confidence_normalization {
    use super::*;

    #[test]
    fn test_non_empty_inputs_always_sum_to_100() {
        for seed in 1..50 {
            for count in 1..12 {
                let input = scrambled_observations(count, seed * 31 + count as u32);
                for rounding in [RoundingMode::HalfAwayFromZero, RoundingMode::HalfToEven] {
                    let distribution = ConfidenceNormalizer::with_rounding(rounding).normalize(&input);
                    assert_eq!(distribution.total(), 100, "seed {} count {}", seed, count);
                }
            }
        }
    }

    #[test]
    fn test_identifiers_and_order_are_preserved() {
        let input = scrambled_observations(8, 5);
        let distribution = normalize_percentages(&input);
        assert_eq!(distribution.len(), input.len());
        for (observation, entry) in input.iter().zip(distribution.iter()) {
            assert_eq!(observation.identifier, entry.identifier);
        }
    }

    #[test]
    fn test_only_the_top_ranked_entry_changes() {
        let normalizer = ConfidenceNormalizer::new();
        let input = scrambled_observations(10, 9);
        let raw: Vec<i32> = input.iter().map(|o| normalizer.raw_percentage(o.confidence)).collect();
        let mut top = 0;
        for index in 1..raw.len() {
            if (raw[index], input[index].confidence) > (raw[top], input[top].confidence) {
                top = index;
            }
        }

        let distribution = normalizer.normalize(&input);
        for (index, entry) in distribution.iter().enumerate() {
            if index != top {
                assert_eq!(entry.percentage, raw[index]);
            }
        }
    }

    #[test]
    fn test_single_observation_becomes_100() {
        let distribution = normalize_percentages(&[ClassObservation::new("person", 0.42)]);
        assert_eq!(distribution.percentage_of("person"), Some(100));
    }

    #[test]
    fn test_concurrent_normalization() {
        let input = scrambled_observations(6, 13);
        let expected = normalize_percentages(&input);
        let results: Vec<_> = (0..32)
            .into_par_iter()
            .map(|_| normalize_percentages(&input))
            .collect();
        assert!(results.iter().all(|d| *d == expected));
    }
}

#[cfg(test)]
mod test_analysis_gate {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_only_one_analysis_in_flight_across_threads() {
        let gate = AnalysisGate::new(Duration::ZERO);
        let now = Instant::now();
        let permits: Vec<_> = (0..64)
            .into_par_iter()
            .filter_map(|_| gate.try_begin(now + Duration::from_millis(1)))
            .collect();
        assert_eq!(permits.len(), 1);
        assert_eq!(gate.dropped_frames(), 63);
        drop(permits);
        assert!(!gate.is_busy());
    }
}
