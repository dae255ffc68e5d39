//! Rule-based face expression and hand gesture classifier
//!
//! Consumes landmark sets produced by an external estimator (468-point face
//! mesh, 21-point hand skeleton), derives a handful of geometric ratios and
//! runs them through fixed threshold cascades. Everything here except
//! [`SlotTracker`] is a pure function; the crate also compiles to
//! WebAssembly so the browser can run the exact same rules.
//!
//! ## Modules
//! - `landmarks`: landmark type and the anatomical index constants
//! - `features`: EAR / MAR / smile / brow ratios and finger extension
//! - `expression`: face expression cascade
//! - `gesture`: hand gesture cascade
//! - `trigger`: (expression, gesture) pattern matching
//! - `slots`: stable slot assignment for multiple detected faces
//! - `wasm`: `wasm-bindgen` exports

pub mod expression;
pub mod features;
pub mod gesture;
pub mod landmarks;
pub mod slots;
pub mod trigger;
pub mod wasm;

pub use expression::{classify_expression, classify_face, ExpressionResult, FaceExpression};
pub use features::{FaceFeatures, FingerState};
pub use gesture::{classify_gesture, classify_hand, HandGesture};
pub use landmarks::Landmark;
pub use slots::SlotTracker;
pub use trigger::{find_trigger, HasPattern, TriggerPattern};

/// Labels produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub face: FaceExpression,
    pub face_confidence: f64,
    pub hand: HandGesture,
}

impl Classification {
    pub fn pattern(&self) -> TriggerPattern {
        TriggerPattern::new(self.face, self.hand)
    }
}

/// Classifies one face and one hand landmark set.
///
/// Either side may be missing; it then resolves to its default label.
pub fn classify(face: Option<&[Landmark]>, hand: Option<&[Landmark]>) -> Classification {
    let face_result = classify_face(face.unwrap_or(&[]));
    Classification {
        face: face_result.label,
        face_confidence: face_result.confidence,
        hand: classify_hand(hand.unwrap_or(&[])),
    }
}
