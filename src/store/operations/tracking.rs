use chrono::{DateTime, Utc};
use expression_classifier::{FaceExpression, HandGesture};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub id: String,
    pub user_id: String,
    pub face_expression: FaceExpression,
    pub hand_gesture: HandGesture,
    pub timestamp: DateTime<Utc>,
}

impl Store {
    pub fn save_tracking(&self, entry: &TrackingEntry) -> Result<(), StoreError> {
        let key = keys::tracking_key(
            &entry.user_id,
            entry.timestamp.timestamp_millis(),
            self.next_seq()?,
            &entry.id,
        )?;
        self.tracking.insert(key.as_bytes(), Self::serialize(entry)?)?;
        Ok(())
    }

    /// A user's most recent entries, newest first.
    pub fn list_tracking(&self, user_id: &str, limit: usize) -> Result<Vec<TrackingEntry>, StoreError> {
        let prefix = keys::tracking_prefix(user_id)?;
        let mut entries = Vec::new();
        for item in self.tracking.scan_prefix(prefix.as_bytes()).take(limit) {
            let (_, value) = item?;
            entries.push(Self::deserialize::<TrackingEntry>(&value)?);
        }
        Ok(entries)
    }
}
