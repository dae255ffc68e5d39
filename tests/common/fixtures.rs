use expression_classifier::landmarks::{face_indices as face, hand_indices as hand};
use expression_classifier::Landmark;
use serde_json::{json, Value};

pub const FACE_MESH_LEN: usize = 468;
pub const HAND_SKELETON_LEN: usize = 21;

fn to_json(points: &[Landmark]) -> Value {
    json!(points)
}

/// Open eyes (EAR 0.25), closed mouth, corners 0.01 above the lip: Happy at 90.
pub fn happy_face_points() -> Vec<Landmark> {
    let mut l = vec![Landmark::new(0.5, 0.5); FACE_MESH_LEN];
    l[face::LEFT_EYE_OUTER] = Landmark::new(0.30, 0.40);
    l[face::LEFT_EYE_INNER] = Landmark::new(0.40, 0.40);
    l[face::LEFT_EYE_UPPER] = Landmark::new(0.35, 0.3875);
    l[face::LEFT_EYE_LOWER] = Landmark::new(0.35, 0.4125);
    l[face::RIGHT_EYE_INNER] = Landmark::new(0.60, 0.40);
    l[face::RIGHT_EYE_OUTER] = Landmark::new(0.70, 0.40);
    l[face::RIGHT_EYE_UPPER] = Landmark::new(0.65, 0.3875);
    l[face::RIGHT_EYE_LOWER] = Landmark::new(0.65, 0.4125);
    l[face::LEFT_BROW_INNER] = Landmark::new(0.42, 0.3775);
    l[face::RIGHT_BROW_INNER] = Landmark::new(0.58, 0.3775);
    l[face::MOUTH_LEFT_CORNER] = Landmark::new(0.40, 0.69);
    l[face::MOUTH_RIGHT_CORNER] = Landmark::new(0.60, 0.69);
    l[face::UPPER_LIP_CENTER] = Landmark::new(0.50, 0.70);
    l[face::LOWER_LIP_CENTER] = Landmark::new(0.50, 0.70);
    l
}

pub fn happy_face() -> Value {
    to_json(&happy_face_points())
}

/// Index and middle raised, thumb folded: Peace.
pub fn peace_hand() -> Value {
    let mut l = vec![Landmark::new(0.5, 0.8); HAND_SKELETON_LEN];
    l[hand::THUMB_IP] = Landmark::new(0.40, 0.60);
    l[hand::THUMB_TIP] = Landmark::new(0.45, 0.65);
    for (tip, pip, raised) in [
        (hand::INDEX_FINGER_TIP, hand::INDEX_FINGER_PIP, true),
        (hand::MIDDLE_FINGER_TIP, hand::MIDDLE_FINGER_PIP, true),
        (hand::RING_FINGER_TIP, hand::RING_FINGER_PIP, false),
        (hand::PINKY_TIP, hand::PINKY_PIP, false),
    ] {
        l[pip] = Landmark::new(0.5, 0.50);
        l[tip] = Landmark::new(0.5, if raised { 0.30 } else { 0.60 });
    }
    to_json(&l)
}

pub fn image_data_url(payload_len: usize) -> String {
    format!("data:image/png;base64,{}", "iVBO".repeat(payload_len.div_ceil(4)))
}

pub fn audio_data_url(payload_len: usize) -> String {
    format!("data:audio/mpeg;base64,{}", "SUQz".repeat(payload_len.div_ceil(4)))
}

pub fn trigger_body(name: &str, face_pattern: &str, hand_pattern: &str) -> Value {
    json!({
        "name": name,
        "facePattern": face_pattern,
        "handPattern": hand_pattern,
        "imageBase64": image_data_url(64),
        "audioBase64": audio_data_url(64),
    })
}
