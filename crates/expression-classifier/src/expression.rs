//! Face expression cascade
//!
//! Ordered threshold rules over [`FaceFeatures`]; the first rule that holds
//! decides the label. All comparisons are strict, so a feature sitting
//! exactly on a threshold does not fire that rule.
//!
//! | # | Condition | Label | Confidence |
//! |---|-----------|-------|------------|
//! | 1 | EAR > 0.22, MAR > 0.45, brow > 0.025 | Surprised | 90 |
//! | 2 | EAR > 0.24, brow > 0.028, 0.25 < MAR < 0.55 | Fear | 85 |
//! | 3 | EAR > 0.20, MAR < 0.25, smile < 0.005 | Angry | 88 |
//! | 4 | EAR < 0.17 | Sad | 70 + (0.20 - EAR) * 400, max 90 |
//! | 5 | smile > 0.007, MAR < 0.4 | Happy | 65 + smile * 2500, max 95 |
//! | 6 | MAR > 0.3, tongue > 0.01 | Disgust | 85 |
//! | 7 | otherwise | Neutral | 65 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FaceFeatures;
use crate::landmarks::Landmark;

// Rule 1
const SURPRISE_EAR: f64 = 0.22;
const SURPRISE_MAR: f64 = 0.45;
const SURPRISE_BROW: f64 = 0.025;

// Rule 2
const FEAR_EAR: f64 = 0.24;
const FEAR_BROW: f64 = 0.028;
const FEAR_MAR_MIN: f64 = 0.25;
const FEAR_MAR_MAX: f64 = 0.55;

// Rule 3
const ANGER_EAR: f64 = 0.20;
const ANGER_MAR: f64 = 0.25;
const ANGER_SMILE: f64 = 0.005;

// Rule 4
const SAD_EAR: f64 = 0.17;
const SAD_EAR_BASELINE: f64 = 0.20;

// Rule 5
const HAPPY_SMILE: f64 = 0.007;
const HAPPY_MAR: f64 = 0.4;

// Rule 6
const DISGUST_MAR: f64 = 0.3;
const DISGUST_TONGUE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FaceExpression {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fear,
    Disgust,
    #[default]
    Neutral,
}

impl FaceExpression {
    pub const ALL: [FaceExpression; 7] = [
        FaceExpression::Happy,
        FaceExpression::Sad,
        FaceExpression::Angry,
        FaceExpression::Surprised,
        FaceExpression::Fear,
        FaceExpression::Disgust,
        FaceExpression::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceExpression::Happy => "Happy",
            FaceExpression::Sad => "Sad",
            FaceExpression::Angry => "Angry",
            FaceExpression::Surprised => "Surprised",
            FaceExpression::Fear => "Fear",
            FaceExpression::Disgust => "Disgust",
            FaceExpression::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for FaceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for FaceExpression {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaceExpression::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Label plus a display confidence in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpressionResult {
    pub label: FaceExpression,
    pub confidence: f64,
}

impl ExpressionResult {
    fn new(label: FaceExpression, confidence: f64) -> Self {
        Self { label, confidence }
    }

    /// Result for a face that could not be measured.
    pub fn undetected() -> Self {
        Self::new(FaceExpression::Neutral, 0.0)
    }
}

pub fn classify_expression(f: &FaceFeatures) -> ExpressionResult {
    let ear = f.avg_ear;

    if ear > SURPRISE_EAR && f.mar > SURPRISE_MAR && f.avg_brow_raise > SURPRISE_BROW {
        return ExpressionResult::new(FaceExpression::Surprised, 90.0);
    }
    if ear > FEAR_EAR && f.avg_brow_raise > FEAR_BROW && f.mar > FEAR_MAR_MIN && f.mar < FEAR_MAR_MAX
    {
        return ExpressionResult::new(FaceExpression::Fear, 85.0);
    }
    if ear > ANGER_EAR && f.mar < ANGER_MAR && f.smile_ratio < ANGER_SMILE {
        return ExpressionResult::new(FaceExpression::Angry, 88.0);
    }
    if ear < SAD_EAR {
        let confidence = (70.0 + (SAD_EAR_BASELINE - ear) * 400.0).min(90.0);
        return ExpressionResult::new(FaceExpression::Sad, confidence);
    }
    if f.smile_ratio > HAPPY_SMILE && f.mar < HAPPY_MAR {
        let confidence = (65.0 + f.smile_ratio * 2500.0).min(95.0);
        return ExpressionResult::new(FaceExpression::Happy, confidence);
    }
    if f.mar > DISGUST_MAR && f.tongue_out > DISGUST_TONGUE {
        return ExpressionResult::new(FaceExpression::Disgust, 85.0);
    }
    ExpressionResult::new(FaceExpression::Neutral, 65.0)
}

/// Classifies a face mesh; malformed input yields Neutral with confidence 0.
pub fn classify_face(landmarks: &[Landmark]) -> ExpressionResult {
    match FaceFeatures::extract(landmarks) {
        Some(features) => classify_expression(&features),
        None => ExpressionResult::undetected(),
    }
}
