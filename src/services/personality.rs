use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use expression_classifier::{FaceExpression, HandGesture};
use serde::Serialize;

use crate::constants::ANALYSIS_WINDOW;
use crate::store::operations::tracking::TrackingEntry;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityAnalysis {
    pub most_common_face: FaceExpression,
    pub most_common_hand: HandGesture,
    pub face_personality: &'static str,
    pub hand_personality: &'static str,
    pub total_tracked: usize,
    pub face_stats: BTreeMap<String, u32>,
    pub hand_stats: BTreeMap<String, u32>,
}

pub fn face_personality(face: FaceExpression) -> &'static str {
    match face {
        FaceExpression::Happy => "Optimistic & Cheerful",
        FaceExpression::Sad => "Sensitive & Emotional",
        FaceExpression::Angry => "Hot-headed & Assertive",
        FaceExpression::Surprised => "Spontaneous & Expressive",
        FaceExpression::Fear => "Alert & Careful",
        FaceExpression::Disgust => "Critical & Selective",
        FaceExpression::Neutral => "Calm & Steady",
    }
}

pub fn hand_personality(hand: HandGesture) -> &'static str {
    match hand {
        HandGesture::ThumbsUp => "Positive & Supportive",
        HandGesture::Peace => "Peaceful & Friendly",
        HandGesture::Fist => "Fighter & Strong",
        HandGesture::OpenHand => "Open & Welcoming",
        HandGesture::Pointing => "Decisive & Directive",
        HandGesture::Three => "Creative & Unique",
        HandGesture::None => "Natural & Simple",
    }
}

/// Most frequent label; on equal counts the one seen first in `newest_first`
/// (the most recently observed) wins.
fn most_common<L: Copy + Eq + Hash>(newest_first: impl IntoIterator<Item = L>) -> Option<(L, HashMap<L, u32>)> {
    let mut counts: HashMap<L, u32> = HashMap::new();
    let mut first_seen: HashMap<L, usize> = HashMap::new();
    for (position, label) in newest_first.into_iter().enumerate() {
        *counts.entry(label).or_default() += 1;
        first_seen.entry(label).or_insert(position);
    }
    let winner = counts
        .iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then(first_seen[*b].cmp(&first_seen[*a])))
        .map(|(label, _)| *label)?;
    Some((winner, counts))
}

fn stats<L: ToString>(counts: HashMap<L, u32>) -> BTreeMap<String, u32> {
    counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

/// `entries` must be ordered newest first. `None` for an empty history.
pub fn analyze(entries: &[TrackingEntry]) -> Option<PersonalityAnalysis> {
    if entries.is_empty() {
        return None;
    }

    let faces = most_common(entries.iter().map(|e| e.face_expression));
    let hands = most_common(entries.iter().map(|e| e.hand_gesture).filter(|h| !h.is_none()));

    let (most_common_face, face_counts) = faces.unwrap_or_default();
    let (most_common_hand, hand_counts) = hands.unwrap_or_default();

    Some(PersonalityAnalysis {
        most_common_face,
        most_common_hand,
        face_personality: face_personality(most_common_face),
        hand_personality: hand_personality(most_common_hand),
        total_tracked: entries.len(),
        face_stats: stats(face_counts),
        hand_stats: stats(hand_counts),
    })
}

/// Analysis over the user's most recent tracking window.
pub fn analyze_user(store: &Store, user_id: &str) -> Result<Option<PersonalityAnalysis>, StoreError> {
    let entries = store.list_tracking(user_id, ANALYSIS_WINDOW)?;
    let analysis = analyze(&entries);
    if let Some(a) = &analysis {
        tracing::debug!(
            user_id,
            total = a.total_tracked,
            face = %a.most_common_face,
            hand = %a.most_common_hand,
            "Personality analysed"
        );
    }
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::*;

    fn entries(labels: &[(FaceExpression, HandGesture)]) -> Vec<TrackingEntry> {
        let now = Utc::now();
        labels
            .iter()
            .enumerate()
            .map(|(i, (face, hand))| TrackingEntry {
                id: format!("e{i}"),
                user_id: "u1".to_string(),
                face_expression: *face,
                hand_gesture: *hand,
                timestamp: now - Duration::seconds(i as i64),
            })
            .collect()
    }

    #[test]
    fn empty_history_has_no_analysis() {
        assert!(analyze(&[]).is_none());
    }

    #[test]
    fn picks_most_frequent_labels() {
        let history = entries(&[
            (FaceExpression::Happy, HandGesture::Peace),
            (FaceExpression::Happy, HandGesture::None),
            (FaceExpression::Sad, HandGesture::Peace),
            (FaceExpression::Happy, HandGesture::Fist),
        ]);
        let analysis = analyze(&history).unwrap();
        assert_eq!(analysis.most_common_face, FaceExpression::Happy);
        assert_eq!(analysis.most_common_hand, HandGesture::Peace);
        assert_eq!(analysis.face_personality, "Optimistic & Cheerful");
        assert_eq!(analysis.hand_personality, "Peaceful & Friendly");
        assert_eq!(analysis.total_tracked, 4);
        assert_eq!(analysis.face_stats["Happy"], 3);
        assert!(!analysis.hand_stats.contains_key("None"));
    }

    #[test]
    fn no_gestures_defaults_to_none() {
        let history = entries(&[(FaceExpression::Fear, HandGesture::None)]);
        let analysis = analyze(&history).unwrap();
        assert_eq!(analysis.most_common_hand, HandGesture::None);
        assert_eq!(analysis.hand_personality, "Natural & Simple");
        assert!(analysis.hand_stats.is_empty());
    }

    #[test]
    fn ties_go_to_most_recent_label() {
        let history = entries(&[
            (FaceExpression::Angry, HandGesture::Three),
            (FaceExpression::Sad, HandGesture::Pointing),
            (FaceExpression::Sad, HandGesture::Pointing),
            (FaceExpression::Angry, HandGesture::Three),
        ]);
        let analysis = analyze(&history).unwrap();
        assert_eq!(analysis.most_common_face, FaceExpression::Angry);
        assert_eq!(analysis.most_common_hand, HandGesture::Three);
    }

    #[test]
    fn analysis_reads_the_store() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        assert!(analyze_user(&store, "u1").unwrap().is_none());

        for entry in entries(&[(FaceExpression::Surprised, HandGesture::OpenHand)]) {
            store.save_tracking(&entry).unwrap();
        }
        let analysis = analyze_user(&store, "u1").unwrap().unwrap();
        assert_eq!(analysis.face_personality, "Spontaneous & Expressive");
        assert_eq!(analysis.hand_personality, "Open & Welcoming");
        assert!(analyze_user(&store, "u2").unwrap().is_none());
    }
}
