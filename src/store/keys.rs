use crate::constants::MAX_USER_ID_LEN;
use crate::store::StoreError;

// Key segments are joined with ':', so a segment must not contain one.
fn segment<'a>(name: &str, value: &'a str) -> Result<&'a str, StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{name} must not be empty")));
    }
    if value.len() > MAX_USER_ID_LEN {
        return Err(StoreError::Validation(format!("{name} is too long")));
    }
    if value.contains(':') || value.chars().any(char::is_control) {
        return Err(StoreError::Validation(format!(
            "{name} contains invalid characters"
        )));
    }
    Ok(value)
}

fn reverse(n: u64) -> u64 {
    u64::MAX - n
}

/// Triggers sort by creation sequence within a user.
pub fn trigger_key(user_id: &str, seq: u64, trigger_id: &str) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{:020}:{}",
        segment("userId", user_id)?,
        seq,
        segment("triggerId", trigger_id)?
    ))
}

pub fn trigger_prefix(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("userId", user_id)?))
}

pub fn trigger_chunk_key(trigger_id: &str, kind: &str, index: u32) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{}:{:010}",
        segment("triggerId", trigger_id)?,
        kind,
        index
    ))
}

pub fn trigger_chunk_prefix(trigger_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("triggerId", trigger_id)?))
}

/// Newest detection first; `seq` breaks ties within one millisecond.
pub fn detection_key(timestamp_ms: i64, seq: u64, detection_id: &str) -> Result<String, StoreError> {
    let ts = timestamp_ms.max(0) as u64;
    Ok(format!(
        "{:020}:{:020}:{}",
        reverse(ts),
        reverse(seq),
        segment("detectionId", detection_id)?
    ))
}

/// Newest entry first within a user.
pub fn tracking_key(
    user_id: &str,
    timestamp_ms: i64,
    seq: u64,
    entry_id: &str,
) -> Result<String, StoreError> {
    let ts = timestamp_ms.max(0) as u64;
    Ok(format!(
        "{}:{:020}:{:020}:{}",
        segment("userId", user_id)?,
        reverse(ts),
        reverse(seq),
        segment("entryId", entry_id)?
    ))
}

pub fn tracking_prefix(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("userId", user_id)?))
}

pub fn profile_key(user_id: &str) -> Result<String, StoreError> {
    Ok(segment("userId", user_id)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_keys_sort_by_creation() {
        let first = trigger_key("u1", 9, "b").unwrap();
        let second = trigger_key("u1", 10, "a").unwrap();
        assert!(first < second);
        assert!(first.starts_with(&trigger_prefix("u1").unwrap()));
    }

    #[test]
    fn detection_key_orders_by_time_desc() {
        let k_new = detection_key(2000, 1, "d2").unwrap();
        let k_old = detection_key(1000, 2, "d1").unwrap();
        assert!(k_new < k_old);
        let later_same_ms = detection_key(1000, 3, "d3").unwrap();
        assert!(later_same_ms < k_old);
    }

    #[test]
    fn tracking_key_is_user_scoped() {
        let k = tracking_key("u1", 1000, 1, "t1").unwrap();
        assert!(k.starts_with(&tracking_prefix("u1").unwrap()));
        assert!(!k.starts_with(&tracking_prefix("u").unwrap()));
    }

    #[test]
    fn chunk_keys_sort_by_index() {
        let a = trigger_chunk_key("t", "image", 2).unwrap();
        let b = trigger_chunk_key("t", "image", 10).unwrap();
        assert!(a < b);

        let c = trigger_chunk_key("t", "image", 999_999).unwrap();
        let d = trigger_chunk_key("t", "image", 1_000_000).unwrap();
        let last = trigger_chunk_key("t", "image", u32::MAX).unwrap();
        assert!(c < d && d < last);
        assert_eq!(d.len(), last.len());
    }

    #[test]
    fn separator_in_segment_is_rejected() {
        assert!(matches!(
            profile_key("a:b"),
            Err(StoreError::Validation(_))
        ));
        assert!(profile_key("").is_err());
        assert!(profile_key(&"x".repeat(MAX_USER_ID_LEN + 1)).is_err());
    }
}
