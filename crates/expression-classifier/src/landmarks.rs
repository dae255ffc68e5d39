//! Landmark type and the index conventions of the upstream estimators
//!
//! Face indices follow the 468-point face mesh, hand indices the 21-point
//! hand skeleton. Every index the classifier reads lives in one of the
//! constant modules below so the dependency on the external convention
//! stays in one place.

use serde::{Deserialize, Serialize};

/// Number of points in a face mesh landmark set.
pub const FACE_MESH_LEN: usize = 468;

/// Number of points in a hand skeleton landmark set.
pub const HAND_SKELETON_LEN: usize = 21;

/// A single normalized landmark point.
///
/// `x` and `y` are relative to frame width/height, `z` is the estimator's
/// relative depth and is never read by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Parses a flat coordinate buffer (`x, y[, z]` per point).
    ///
    /// Returns `None` for a stride other than 2 or 3 or a buffer whose length
    /// is not a multiple of the stride.
    pub fn from_flat(coords: &[f64], stride: usize) -> Option<Vec<Landmark>> {
        if !(2..=3).contains(&stride) || coords.len() % stride != 0 {
            return None;
        }
        Some(
            coords
                .chunks_exact(stride)
                .map(|c| Landmark {
                    x: c[0],
                    y: c[1],
                    z: if stride == 3 { c[2] } else { 0.0 },
                })
                .collect(),
        )
    }

    pub fn distance(&self, other: &Landmark) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Mean x/y of a landmark set, `None` when empty.
pub fn centroid(landmarks: &[Landmark]) -> Option<Landmark> {
    if landmarks.is_empty() {
        return None;
    }
    let n = landmarks.len() as f64;
    let (sx, sy) = landmarks
        .iter()
        .fold((0.0, 0.0), |(sx, sy), l| (sx + l.x, sy + l.y));
    Some(Landmark::new(sx / n, sy / n))
}

/// Face mesh indices used by the feature extractor.
pub mod face_indices {
    pub const UPPER_LIP_CENTER: usize = 13;
    pub const LOWER_LIP_CENTER: usize = 14;
    pub const MOUTH_LEFT_CORNER: usize = 61;
    pub const MOUTH_RIGHT_CORNER: usize = 291;

    pub const LEFT_EYE_UPPER: usize = 159;
    pub const LEFT_EYE_LOWER: usize = 145;
    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;

    pub const RIGHT_EYE_UPPER: usize = 386;
    pub const RIGHT_EYE_LOWER: usize = 374;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_EYE_OUTER: usize = 263;

    pub const LEFT_BROW_INNER: usize = 107;
    pub const RIGHT_BROW_INNER: usize = 336;
}

/// Hand skeleton indices used by the feature extractor.
pub mod hand_indices {
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}
