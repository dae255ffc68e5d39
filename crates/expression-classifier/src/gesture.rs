//! Hand gesture cascade
//!
//! Decides a gesture from which digits are extended. Rules are checked in
//! order and the first match wins; combinations no rule covers map to
//! [`HandGesture::None`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::expression::UnknownLabel;
use crate::features::FingerState;
use crate::landmarks::Landmark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HandGesture {
    Fist,
    #[serde(rename = "Thumbs Up")]
    ThumbsUp,
    Peace,
    Pointing,
    #[serde(rename = "Open Hand")]
    OpenHand,
    Three,
    #[default]
    None,
}

impl HandGesture {
    pub const ALL: [HandGesture; 7] = [
        HandGesture::Fist,
        HandGesture::ThumbsUp,
        HandGesture::Peace,
        HandGesture::Pointing,
        HandGesture::OpenHand,
        HandGesture::Three,
        HandGesture::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandGesture::Fist => "Fist",
            HandGesture::ThumbsUp => "Thumbs Up",
            HandGesture::Peace => "Peace",
            HandGesture::Pointing => "Pointing",
            HandGesture::OpenHand => "Open Hand",
            HandGesture::Three => "Three",
            HandGesture::None => "None",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HandGesture::None)
    }
}

impl fmt::Display for HandGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandGesture {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HandGesture::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

pub fn classify_gesture(fingers: &FingerState) -> HandGesture {
    let FingerState {
        thumb,
        index,
        middle,
        ring,
        pinky,
    } = *fingers;
    let count = fingers.extended_count();

    if count == 0 {
        return HandGesture::Fist;
    }
    if thumb && count == 1 {
        return HandGesture::ThumbsUp;
    }
    if !thumb && index && middle && !ring && !pinky {
        return HandGesture::Peace;
    }
    if !thumb && index && !middle && !ring && !pinky {
        return HandGesture::Pointing;
    }
    if count == 5 {
        return HandGesture::OpenHand;
    }
    if thumb && index && !middle && !ring && pinky {
        return HandGesture::Three;
    }
    HandGesture::None
}

/// Classifies a hand skeleton; anything but 21 points yields `None`.
pub fn classify_hand(landmarks: &[Landmark]) -> HandGesture {
    FingerState::extract(landmarks)
        .map(|fingers| classify_gesture(&fingers))
        .unwrap_or_default()
}
