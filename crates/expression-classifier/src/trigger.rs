//! Trigger pattern matching
//!
//! A trigger fires on an exact (expression, gesture) pair. Stored records are
//! scanned in the order given and the first exact match wins.

use serde::{Deserialize, Serialize};

use crate::expression::FaceExpression;
use crate::gesture::HandGesture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPattern {
    pub face_pattern: FaceExpression,
    pub hand_pattern: HandGesture,
}

impl TriggerPattern {
    pub fn new(face_pattern: FaceExpression, hand_pattern: HandGesture) -> Self {
        Self {
            face_pattern,
            hand_pattern,
        }
    }
}

/// Anything carrying a trigger pattern.
pub trait HasPattern {
    fn pattern(&self) -> TriggerPattern;
}

impl HasPattern for TriggerPattern {
    fn pattern(&self) -> TriggerPattern {
        *self
    }
}

/// First record whose pattern equals `observed`, or `None`.
pub fn find_trigger<'a, T, I>(records: I, observed: TriggerPattern) -> Option<&'a T>
where
    T: HasPattern + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().find(|r| r.pattern() == observed)
}
