use chrono::{DateTime, Utc};
use expression_classifier::trigger::HasPattern;
use expression_classifier::{find_trigger, FaceExpression, HandGesture, TriggerPattern};
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;

use crate::store::chunks::{payload_digest, reassemble, split_payload};
use crate::store::{keys, transaction_error};
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }
}

/// Trigger metadata; media lives in `trigger_chunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub face_pattern: FaceExpression,
    pub hand_pattern: HandGesture,
    pub image_chunk_count: u32,
    pub audio_chunk_count: u32,
    pub image_digest: String,
    pub audio_digest: String,
    pub created_at: DateTime<Utc>,
}

impl HasPattern for Trigger {
    fn pattern(&self) -> TriggerPattern {
        TriggerPattern::new(self.face_pattern, self.hand_pattern)
    }
}

impl Trigger {
    fn chunk_meta(&self, kind: MediaKind) -> (u32, &str) {
        match kind {
            MediaKind::Image => (self.image_chunk_count, &self.image_digest),
            MediaKind::Audio => (self.audio_chunk_count, &self.audio_digest),
        }
    }
}

/// Trigger with its media reassembled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWithMedia {
    #[serde(flatten)]
    pub trigger: Trigger,
    pub image_base64: String,
    pub audio_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MediaChunk {
    #[serde(rename = "type")]
    kind: MediaKind,
    index: u32,
    data: String,
}

pub struct NewTrigger<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub pattern: TriggerPattern,
    pub image: &'a str,
    pub audio: &'a str,
}

impl Store {
    /// Writes trigger metadata and every media chunk in one transaction.
    pub fn create_trigger(&self, new: &NewTrigger<'_>, chunk_size: usize) -> Result<Trigger, StoreError> {
        let trigger_id = uuid::Uuid::new_v4().to_string();
        let key = keys::trigger_key(new.user_id, self.next_seq()?, &trigger_id)?;

        let mut chunk_entries = Vec::new();
        let mut counts = [0u32; 2];
        for (slot, (kind, payload)) in [(MediaKind::Image, new.image), (MediaKind::Audio, new.audio)]
            .into_iter()
            .enumerate()
        {
            let pieces = split_payload(payload, chunk_size);
            counts[slot] = pieces.len() as u32;
            for (index, data) in pieces.into_iter().enumerate() {
                let chunk = MediaChunk {
                    kind,
                    index: index as u32,
                    data: data.to_string(),
                };
                let chunk_key = keys::trigger_chunk_key(&trigger_id, kind.as_str(), chunk.index)?;
                chunk_entries.push((chunk_key, Self::serialize(&chunk)?));
            }
        }

        let trigger = Trigger {
            id: trigger_id,
            user_id: new.user_id.to_string(),
            name: new.name.to_string(),
            face_pattern: new.pattern.face_pattern,
            hand_pattern: new.pattern.hand_pattern,
            image_chunk_count: counts[0],
            audio_chunk_count: counts[1],
            image_digest: payload_digest(new.image),
            audio_digest: payload_digest(new.audio),
            created_at: Utc::now(),
        };
        let trigger_bytes = Self::serialize(&trigger)?;

        (&self.triggers, &self.trigger_chunks)
            .transaction(|(tx_triggers, tx_chunks)| {
                for (chunk_key, bytes) in &chunk_entries {
                    tx_chunks.insert(chunk_key.as_bytes(), bytes.as_slice())?;
                }
                tx_triggers.insert(key.as_bytes(), trigger_bytes.as_slice())?;
                Ok::<_, ConflictableTransactionError<StoreError>>(())
            })
            .map_err(transaction_error)?;

        tracing::info!(
            trigger_id = %trigger.id,
            user_id = %trigger.user_id,
            image_chunks = trigger.image_chunk_count,
            audio_chunks = trigger.audio_chunk_count,
            "Trigger created"
        );
        Ok(trigger)
    }

    /// A user's triggers in creation order.
    pub fn list_triggers(&self, user_id: &str) -> Result<Vec<Trigger>, StoreError> {
        let prefix = keys::trigger_prefix(user_id)?;
        let mut triggers = Vec::new();
        for item in self.triggers.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            triggers.push(Self::deserialize::<Trigger>(&value)?);
        }
        Ok(triggers)
    }

    fn find_trigger_entry(
        &self,
        user_id: &str,
        trigger_id: &str,
    ) -> Result<Option<(sled::IVec, Trigger)>, StoreError> {
        let prefix = keys::trigger_prefix(user_id)?;
        let suffix = format!(":{trigger_id}");

        for item in self.triggers.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            if key.ends_with(suffix.as_bytes()) {
                return Ok(Some((key, Self::deserialize::<Trigger>(&value)?)));
            }
        }
        Ok(None)
    }

    pub fn get_trigger(&self, user_id: &str, trigger_id: &str) -> Result<Option<Trigger>, StoreError> {
        Ok(self
            .find_trigger_entry(user_id, trigger_id)?
            .map(|(_, trigger)| trigger))
    }

    pub fn require_trigger(&self, user_id: &str, trigger_id: &str) -> Result<Trigger, StoreError> {
        self.get_trigger(user_id, trigger_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "Trigger".to_string(),
                key: trigger_id.to_string(),
            })
    }

    /// Reassembles one media payload, verifying chunk count and digest.
    pub fn load_trigger_media(&self, trigger: &Trigger, kind: MediaKind) -> Result<String, StoreError> {
        let prefix = format!(
            "{}{}:",
            keys::trigger_chunk_prefix(&trigger.id)?,
            kind.as_str()
        );
        let mut chunks = Vec::new();
        for item in self.trigger_chunks.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let chunk: MediaChunk = Self::deserialize(&value)?;
            chunks.push((chunk.index, chunk.data));
        }

        let (expected, digest) = trigger.chunk_meta(kind);
        reassemble(chunks, expected, Some(digest)).map_err(|e| {
            tracing::error!(trigger_id = %trigger.id, kind = kind.as_str(), error = %e, "Trigger media is corrupt");
            StoreError::CorruptChunks {
                trigger_id: trigger.id.clone(),
                kind: kind.as_str().to_string(),
                source: e,
            }
        })
    }

    pub fn with_media(&self, trigger: Trigger) -> Result<TriggerWithMedia, StoreError> {
        let image_base64 = self.load_trigger_media(&trigger, MediaKind::Image)?;
        let audio_base64 = self.load_trigger_media(&trigger, MediaKind::Audio)?;
        Ok(TriggerWithMedia {
            trigger,
            image_base64,
            audio_base64,
        })
    }

    /// Removes all chunks and then the metadata, atomically. Returns `false`
    /// when the trigger does not exist.
    pub fn delete_trigger(&self, user_id: &str, trigger_id: &str) -> Result<bool, StoreError> {
        let Some((key, _)) = self.find_trigger_entry(user_id, trigger_id)? else {
            return Ok(false);
        };

        let chunk_keys = self.chunk_keys(trigger_id)?;
        (&self.triggers, &self.trigger_chunks)
            .transaction(|(tx_triggers, tx_chunks)| {
                for chunk_key in &chunk_keys {
                    tx_chunks.remove(&chunk_key[..])?;
                }
                tx_triggers.remove(&key[..])?;
                Ok::<_, ConflictableTransactionError<StoreError>>(())
            })
            .map_err(transaction_error)?;

        tracing::info!(trigger_id, user_id, chunks = chunk_keys.len(), "Trigger deleted");
        Ok(true)
    }

    fn chunk_keys(&self, trigger_id: &str) -> Result<Vec<sled::IVec>, StoreError> {
        let prefix = keys::trigger_chunk_prefix(trigger_id)?;
        let mut chunk_keys = Vec::new();
        for item in self.trigger_chunks.scan_prefix(prefix.as_bytes()) {
            let (chunk_key, _) = item?;
            chunk_keys.push(chunk_key);
        }
        Ok(chunk_keys)
    }

    pub fn count_trigger_chunks(&self, trigger_id: &str) -> Result<usize, StoreError> {
        Ok(self.chunk_keys(trigger_id)?.len())
    }

    /// Earliest-created trigger of the user whose pattern equals `observed`.
    pub fn match_trigger(
        &self,
        user_id: &str,
        observed: TriggerPattern,
    ) -> Result<Option<Trigger>, StoreError> {
        let triggers = self.list_triggers(user_id)?;
        Ok(find_trigger(&triggers, observed).cloned())
    }

    /// Rewrites chunk keys whose index is not in the current key format.
    pub fn rekey_trigger_chunks(&self) -> Result<usize, StoreError> {
        let mut rewritten = 0usize;
        for item in self.trigger_chunks.iter() {
            let (chunk_key, value) = item?;
            let key_text = String::from_utf8_lossy(&chunk_key).into_owned();
            let owner = key_text.split(':').next().unwrap_or_default();
            let chunk: MediaChunk = Self::deserialize(&value)?;
            let wanted = keys::trigger_chunk_key(owner, chunk.kind.as_str(), chunk.index)?;
            if wanted != key_text {
                self.trigger_chunks
                    .transaction(|tx| {
                        tx.insert(wanted.as_bytes(), value.clone())?;
                        tx.remove(chunk_key.clone())?;
                        Ok::<_, ConflictableTransactionError<StoreError>>(())
                    })
                    .map_err(transaction_error)?;
                rewritten += 1;
            }
        }
        if rewritten > 0 {
            tracing::info!(rewritten, "Rewrote trigger chunk keys");
        }
        Ok(rewritten)
    }

    /// Deletes chunks whose trigger metadata no longer exists.
    pub fn purge_orphan_chunks(&self) -> Result<usize, StoreError> {
        let mut live = std::collections::HashSet::new();
        for item in self.triggers.iter() {
            let (_, value) = item?;
            live.insert(Self::deserialize::<Trigger>(&value)?.id);
        }

        let mut removed = 0usize;
        for item in self.trigger_chunks.iter() {
            let (chunk_key, _) = item?;
            let key_text = String::from_utf8_lossy(&chunk_key);
            let owner = key_text.split(':').next().unwrap_or_default();
            if !live.contains(owner) {
                self.trigger_chunks.remove(&chunk_key)?;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::warn!(removed, "Purged orphan trigger chunks");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::store::chunks::ReassemblyError;

    fn image(len: usize) -> String {
        format!("data:image/png;base64,{}", "A".repeat(len))
    }

    fn audio(len: usize) -> String {
        format!("data:audio/mp3;base64,{}", "B".repeat(len))
    }

    fn new_trigger<'a>(user_id: &'a str, name: &'a str, image: &'a str, audio: &'a str) -> NewTrigger<'a> {
        NewTrigger {
            user_id,
            name,
            pattern: TriggerPattern::new(FaceExpression::Happy, HandGesture::Peace),
            image,
            audio,
        }
    }

    #[test]
    fn media_round_trips_through_chunks() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(95), audio(40));

        let created = store.create_trigger(&new_trigger("u1", "wave", &img, &aud), 16).unwrap();
        assert_eq!(created.image_chunk_count as usize, img.len().div_ceil(16));
        assert_eq!(created.audio_chunk_count as usize, aud.len().div_ceil(16));

        let loaded = store.with_media(created.clone()).unwrap();
        assert_eq!(loaded.image_base64, img);
        assert_eq!(loaded.audio_base64, aud);
    }

    #[test]
    fn missing_chunk_is_reported() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(64), audio(8));
        let created = store.create_trigger(&new_trigger("u1", "t", &img, &aud), 16).unwrap();

        let victim = keys::trigger_chunk_key(&created.id, "image", 1).unwrap();
        store.trigger_chunks.remove(victim.as_bytes()).unwrap();

        let err = store.load_trigger_media(&created, MediaKind::Image).unwrap_err();
        assert!(matches!(
            err,
            StoreError::CorruptChunks {
                source: ReassemblyError::Missing { index: 1 },
                ..
            }
        ));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("chunk 1 is missing"));
        assert!(store.load_trigger_media(&created, MediaKind::Audio).is_ok());
    }

    #[test]
    fn short_chunk_keys_are_rewritten() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(40), audio(8));
        let created = store.create_trigger(&new_trigger("u1", "t", &img, &aud), 16).unwrap();

        for index in 0..created.image_chunk_count {
            let key = keys::trigger_chunk_key(&created.id, "image", index).unwrap();
            let value = store.trigger_chunks.remove(key.as_bytes()).unwrap().unwrap();
            let short = format!("{}:image:{:06}", created.id, index);
            store.trigger_chunks.insert(short.as_bytes(), value).unwrap();
        }

        assert_eq!(store.rekey_trigger_chunks().unwrap(), created.image_chunk_count as usize);
        assert_eq!(store.rekey_trigger_chunks().unwrap(), 0);
        assert_eq!(store.load_trigger_media(&created, MediaKind::Image).unwrap(), img);
    }

    #[test]
    fn delete_removes_every_chunk() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(50), audio(50));
        let keep = store.create_trigger(&new_trigger("u1", "keep", &img, &aud), 10).unwrap();
        let gone = store.create_trigger(&new_trigger("u1", "gone", &img, &aud), 10).unwrap();

        assert!(store.delete_trigger("u1", &gone.id).unwrap());
        assert_eq!(store.count_trigger_chunks(&gone.id).unwrap(), 0);
        assert!(store.get_trigger("u1", &gone.id).unwrap().is_none());
        assert!(store.count_trigger_chunks(&keep.id).unwrap() > 0);
        assert!(!store.delete_trigger("u1", &gone.id).unwrap());
    }

    #[test]
    fn triggers_are_user_scoped() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(4), audio(4));
        let t = store.create_trigger(&new_trigger("alice", "a", &img, &aud), 1024).unwrap();

        assert!(store.get_trigger("bob", &t.id).unwrap().is_none());
        assert!(matches!(
            store.require_trigger("bob", &t.id),
            Err(StoreError::NotFound { .. })
        ));
        assert!(!store.delete_trigger("bob", &t.id).unwrap());
        assert!(store.list_triggers("bob").unwrap().is_empty());
    }

    #[test]
    fn match_prefers_earliest_trigger() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(4), audio(4));
        let first = store.create_trigger(&new_trigger("u1", "first", &img, &aud), 1024).unwrap();
        store.create_trigger(&new_trigger("u1", "second", &img, &aud), 1024).unwrap();

        let names: Vec<String> = store.list_triggers("u1").unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["first", "second"]);

        let hit = store
            .match_trigger("u1", TriggerPattern::new(FaceExpression::Happy, HandGesture::Peace))
            .unwrap();
        assert_eq!(hit.map(|t| t.id), Some(first.id));
        let miss = store
            .match_trigger("u1", TriggerPattern::new(FaceExpression::Sad, HandGesture::Peace))
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn orphan_chunks_are_purged() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let (img, aud) = (image(20), audio(20));
        let t = store.create_trigger(&new_trigger("u1", "t", &img, &aud), 8).unwrap();
        let stray = keys::trigger_chunk_key("ghost", "image", 0).unwrap();
        store.trigger_chunks.insert(stray.as_bytes(), b"{}".to_vec()).unwrap();

        assert_eq!(store.purge_orphan_chunks().unwrap(), 1);
        assert!(store.with_media(t).is_ok());
    }
}
