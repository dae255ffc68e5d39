use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    pub user_id: String,
    pub photo_url: String,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn get_profile_photo(&self, user_id: &str) -> Result<Option<ProfilePhoto>, StoreError> {
        let key = keys::profile_key(user_id)?;
        match self.profiles.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_profile_photo(&self, user_id: &str, photo_url: &str) -> Result<ProfilePhoto, StoreError> {
        let key = keys::profile_key(user_id)?;
        let photo = ProfilePhoto {
            user_id: user_id.to_string(),
            photo_url: photo_url.to_string(),
            updated_at: Utc::now(),
        };
        self.profiles.insert(key.as_bytes(), Self::serialize(&photo)?)?;
        Ok(photo)
    }
}
