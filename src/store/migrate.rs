use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_purge_orphan_chunks", m002_purge_orphan_chunks),
        ("003_widen_chunk_keys", m003_widen_chunk_keys),
    ]
}

/// Applies every migration newer than the stored version.
///
/// Each migration must be idempotent: a crash between the migration and
/// `set_version` reruns it on the next start. The version is persisted after
/// every step and never moves backwards.
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    let Some(raw) = store.config_versions.get(VERSION_KEY.as_bytes())? else {
        return Ok(0);
    };
    let bytes: [u8; 4] = raw.as_ref().try_into().map_err(|_| StoreError::Migration {
        version: 0,
        message: format!("stored version has {} bytes, expected 4", raw.len()),
    })?;
    Ok(u32::from_be_bytes(bytes))
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), version.to_be_bytes().to_vec())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

// Drops chunks whose trigger metadata no longer exists.
fn m002_purge_orphan_chunks(store: &Store) -> Result<(), StoreError> {
    store.purge_orphan_chunks()?;
    Ok(())
}

// Chunk indexes were zero-padded to six digits before.
fn m003_widen_chunk_keys(store: &Store) -> Result<(), StoreError> {
    store.rekey_trigger_chunks()?;
    Ok(())
}
