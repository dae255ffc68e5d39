//! Geometric features derived from one landmark set
//!
//! Face features are plain ratios of landmark coordinate differences; hand
//! features are one extension flag per digit. Malformed input yields `None`,
//! which the classifiers map to their default label.

use serde::Serialize;

use crate::landmarks::{face_indices as face, hand_indices as hand};
use crate::landmarks::{Landmark, FACE_MESH_LEN, HAND_SKELETON_LEN};

/// Added to the mouth width so coincident mouth corners never divide by zero.
pub const MAR_EPSILON: f64 = 0.001;

/// Scalars derived from a face mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceFeatures {
    pub ear_left: f64,
    pub ear_right: f64,
    pub avg_ear: f64,
    pub mouth_height: f64,
    pub mouth_width: f64,
    pub mar: f64,
    /// Upper lip center minus mean mouth corner height; positive reads as a smile.
    pub smile_ratio: f64,
    pub avg_brow_raise: f64,
    /// Not used by the cascade.
    pub brow_distance: f64,
    /// Same computation as `mouth_height`; kept as its own field because the
    /// disgust rule reads it under this name.
    pub tongue_out: f64,
}

impl FaceFeatures {
    /// Extracts features from a face mesh.
    ///
    /// Meshes with refined iris points (478) carry the 468 base points first,
    /// so anything at least `FACE_MESH_LEN` long is accepted.
    pub fn extract(landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() < FACE_MESH_LEN {
            return None;
        }
        let l = landmarks;

        let ear_left = (l[face::LEFT_EYE_UPPER].y - l[face::LEFT_EYE_LOWER].y).abs()
            / (l[face::LEFT_EYE_OUTER].x - l[face::LEFT_EYE_INNER].x).abs();
        let ear_right = (l[face::RIGHT_EYE_UPPER].y - l[face::RIGHT_EYE_LOWER].y).abs()
            / (l[face::RIGHT_EYE_INNER].x - l[face::RIGHT_EYE_OUTER].x).abs();
        let avg_ear = (ear_left + ear_right) / 2.0;

        let upper_lip = l[face::UPPER_LIP_CENTER];
        let lower_lip = l[face::LOWER_LIP_CENTER];
        let left_corner = l[face::MOUTH_LEFT_CORNER];
        let right_corner = l[face::MOUTH_RIGHT_CORNER];

        let mouth_height = (upper_lip.y - lower_lip.y).abs();
        let mouth_width = (left_corner.x - right_corner.x).abs();
        let mar = mouth_height / (mouth_width + MAR_EPSILON);

        let smile_ratio = upper_lip.y - (left_corner.y + right_corner.y) / 2.0;

        let left_brow = l[face::LEFT_BROW_INNER];
        let right_brow = l[face::RIGHT_BROW_INNER];
        let avg_brow_raise = ((l[face::LEFT_EYE_UPPER].y - left_brow.y)
            + (l[face::RIGHT_EYE_UPPER].y - right_brow.y))
            / 2.0;
        let brow_distance = (left_brow.x - right_brow.x).abs();

        let tongue_out = (upper_lip.y - lower_lip.y).abs();

        Some(Self {
            ear_left,
            ear_right,
            avg_ear,
            mouth_height,
            mouth_width,
            mar,
            smile_ratio,
            avg_brow_raise,
            brow_distance,
            tongue_out,
        })
    }
}

/// Extension flag per digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    pub fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    /// Extracts finger extension from a hand skeleton.
    ///
    /// The thumb moves mostly sideways, so it compares x of tip and IP joint;
    /// the other fingers count as raised when the tip sits above the PIP joint
    /// (smaller y in image coordinates).
    pub fn extract(landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() != HAND_SKELETON_LEN {
            return None;
        }
        let l = landmarks;
        let raised = |tip: usize, pip: usize| l[tip].y < l[pip].y;

        Some(Self {
            thumb: l[hand::THUMB_TIP].x < l[hand::THUMB_IP].x,
            index: raised(hand::INDEX_FINGER_TIP, hand::INDEX_FINGER_PIP),
            middle: raised(hand::MIDDLE_FINGER_TIP, hand::MIDDLE_FINGER_PIP),
            ring: raised(hand::RING_FINGER_TIP, hand::RING_FINGER_PIP),
            pinky: raised(hand::PINKY_TIP, hand::PINKY_PIP),
        })
    }

    pub fn extended_count(&self) -> u8 {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&extended| extended)
            .count() as u8
    }
}
