// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The fixed segmentation class taxonomy.
//!
//! Only the class count matters to decoding. Names are kept here so summaries
//! and tools can label class indices; display colors belong to presentation.

/// Number of classes the segmentation model distinguishes
pub const NUM_CLASSES: usize = 29;

/// Class names indexed by class id. `"--"` marks unused slots.
pub const SEGMENTATION_CLASS_NAMES: [&str; NUM_CLASSES] = [
    "--",
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "--",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "--",
    "backpack",
    "umbrella",
];

/// Name of a class id, or `None` outside the taxonomy
pub fn class_name(index: usize) -> Option<&'static str> {
    SEGMENTATION_CLASS_NAMES.get(index).copied()
}

/// True for ids that carry a real label rather than a placeholder
pub fn is_labeled_class(index: usize) -> bool {
    matches!(class_name(index), Some(name) if name != "--")
}
