// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared numeric helpers for decoding and normalization.

/// Largest class count a `u8` cell can hold
pub const MAX_CLASS_COUNT: usize = u8::MAX as usize + 1;

/// Reduces a raw model value into `[0, class_count)` with true (non-negative) modulo.
///
/// `-1` maps to `class_count - 1`, not to `-1` as a truncating remainder would.
/// Returns `None` unless `class_count` is in `1..=MAX_CLASS_COUNT`.
#[inline]
pub fn reduce_class_index(value: i32, class_count: usize) -> Option<u8> {
    if class_count == 0 || class_count > MAX_CLASS_COUNT {
        return None;
    }
    u8::try_from((value as i64).rem_euclid(class_count as i64)).ok()
}

/// Rounds to the nearest integer, ties away from zero (`2.5 -> 3`, `-2.5 -> -3`).
#[inline]
pub fn round_half_away_from_zero(value: f32) -> f32 {
    value.round()
}

/// Rounds to the nearest integer, ties to the even neighbor (`2.5 -> 2`, `3.5 -> 4`).
#[inline]
pub fn round_half_to_even(value: f32) -> f32 {
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        value.round()
    }
}

/// Narrows to `i32`, clamping at the bounds
#[inline]
pub fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
