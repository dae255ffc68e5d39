//! Browser bindings
//!
//! Thin `wasm-bindgen` wrappers over the pure classifier so the page can run
//! the same rules next to the landmark estimator. Landmarks arrive either as
//! flat coordinate buffers (cheap to pass) or as the estimator's own
//! `{x, y, z}` object arrays.

use wasm_bindgen::prelude::*;

use crate::expression::{classify_face, ExpressionResult};
use crate::gesture::classify_hand;
use crate::landmarks::Landmark;
use crate::slots::SlotTracker;

/// Face classification result handed to JS.
#[wasm_bindgen]
pub struct FaceResult {
    inner: ExpressionResult,
}

#[wasm_bindgen]
impl FaceResult {
    #[wasm_bindgen(getter)]
    pub fn label(&self) -> String {
        self.inner.label.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn confidence(&self) -> f64 {
        self.inner.confidence
    }
}

impl From<ExpressionResult> for FaceResult {
    fn from(inner: ExpressionResult) -> Self {
        Self { inner }
    }
}

/// Classifies a face from a flat `x, y[, z]` buffer.
#[wasm_bindgen(js_name = "classifyFace")]
pub fn classify_face_flat(coords: &[f64], stride: usize) -> FaceResult {
    let landmarks = Landmark::from_flat(coords, stride).unwrap_or_default();
    classify_face(&landmarks).into()
}

/// Classifies a hand from a flat `x, y[, z]` buffer and returns the label.
#[wasm_bindgen(js_name = "classifyHand")]
pub fn classify_hand_flat(coords: &[f64], stride: usize) -> String {
    let landmarks = Landmark::from_flat(coords, stride).unwrap_or_default();
    classify_hand(&landmarks).as_str().to_string()
}

/// Classifies a face from an array of `{x, y, z?}` objects.
#[wasm_bindgen(js_name = "classifyFaceLandmarks")]
pub fn classify_face_landmarks(landmarks: JsValue) -> FaceResult {
    classify_face(&decode_landmarks(landmarks)).into()
}

#[wasm_bindgen(js_name = "classifyHandLandmarks")]
pub fn classify_hand_landmarks(landmarks: JsValue) -> String {
    classify_hand(&decode_landmarks(landmarks)).as_str().to_string()
}

// Undecodable input becomes an empty set, which classifies as the default label.
fn decode_landmarks(value: JsValue) -> Vec<Landmark> {
    serde_wasm_bindgen::from_value(value).unwrap_or_default()
}

/// Slot tracker for pages that draw several faces at once.
#[wasm_bindgen]
pub struct SubjectTracker {
    inner: SlotTracker,
}

impl Default for SubjectTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SubjectTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: SlotTracker::new(),
        }
    }

    /// Takes centroids as a flat `x, y` buffer; returns one slot per subject,
    /// `-1` where no slot was free.
    pub fn assign(&mut self, centroids: &[f64]) -> Vec<i32> {
        let points = Landmark::from_flat(centroids, 2).unwrap_or_default();
        self.inner.assign(&points).into_iter().map(slot_index).collect()
    }

    /// Takes every subject's landmarks back to back in one flat buffer, with
    /// `counts[i]` points for subject `i`. Subjects with no points get `-1`.
    /// A buffer that does not add up to `counts` leaves the slots untouched.
    #[wasm_bindgen(js_name = "assignLandmarks")]
    pub fn assign_landmarks(&mut self, coords: &[f64], stride: usize, counts: &[u32]) -> Vec<i32> {
        match split_subjects(coords, stride, counts) {
            Some(subjects) => self
                .inner
                .assign_subjects(&subjects)
                .into_iter()
                .map(slot_index)
                .collect(),
            None => vec![-1; counts.len()],
        }
    }

    #[wasm_bindgen(js_name = "colorOf")]
    pub fn color_of(&self, slot: usize) -> Option<String> {
        SlotTracker::color_of(slot).map(str::to_string)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

fn slot_index(slot: Option<usize>) -> i32 {
    slot.map_or(-1, |s| s as i32)
}

fn split_subjects(coords: &[f64], stride: usize, counts: &[u32]) -> Option<Vec<Vec<Landmark>>> {
    let points = Landmark::from_flat(coords, stride)?;
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if total != points.len() {
        return None;
    }
    let mut rest = points.as_slice();
    Some(
        counts
            .iter()
            .map(|&c| {
                let (subject, tail) = rest.split_at(c as usize);
                rest = tail;
                subject.to_vec()
            })
            .collect(),
    )
}
