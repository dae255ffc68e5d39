use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionType {
    Face,
    Expression,
    Gesture,
    Pose,
    Hand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: String,
    #[serde(rename = "type")]
    pub detection_type: DetectionType,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn save_detection(&self, detection: &Detection) -> Result<(), StoreError> {
        let key = keys::detection_key(
            detection.created_at.timestamp_millis(),
            self.next_seq()?,
            &detection.id,
        )?;
        self.detections
            .insert(key.as_bytes(), Self::serialize(detection)?)?;
        Ok(())
    }

    /// Most recent detections first, optionally restricted to one user.
    pub fn list_detections(
        &self,
        limit: usize,
        user_id: Option<&str>,
    ) -> Result<Vec<Detection>, StoreError> {
        let mut detections = Vec::new();
        for item in self.detections.iter() {
            if detections.len() >= limit {
                break;
            }
            let (_, value) = item?;
            let detection: Detection = Self::deserialize(&value)?;
            if user_id.is_some_and(|uid| detection.user_id.as_deref() != Some(uid)) {
                continue;
            }
            detections.push(detection);
        }
        Ok(detections)
    }
}
