use crate::addons::save_addons;
use crate::connection::CacheError;
use hangar_core::addon::Addon;
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No legacy file on disk; nothing to do.
    NotPresent,
    /// The legacy file was not a usable addon list. It was still removed.
    Discarded(String),
    /// This many addons were imported into the cache.
    Migrated(usize),
}

/// One-time, best-effort import of the legacy flat-file cache. The legacy
/// file is deleted whether or not anything could be imported, so the path is
/// idempotent; only a failed save keeps it for a retry on the next run.
pub fn migrate_legacy_addons(
    conn: &mut Connection,
    path: &Path,
) -> Result<MigrationOutcome, CacheError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(MigrationOutcome::NotPresent);
        }
        Err(err) => return Err(CacheError::Read(err)),
    };

    let outcome = match serde_json::from_str::<Vec<Addon>>(&content) {
        Ok(addons) if addons.is_empty() => {
            MigrationOutcome::Discarded("legacy cache was empty".to_string())
        }
        Ok(addons) => {
            save_addons(conn, &addons)?;
            MigrationOutcome::Migrated(addons.len())
        }
        Err(err) => MigrationOutcome::Discarded(err.to_string()),
    };

    let _ = std::fs::remove_file(path);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use crate::addons::load_addons;
    use crate::connection::open_cache_in_memory;
    use crate::migrate::{migrate_legacy_addons, MigrationOutcome};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str) -> PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hangar-migrate-{}-{}-{}.json",
            name,
            std::process::id(),
            timestamp
        ))
    }

    const LEGACY_JSON: &str = r#"[
        {
            "title": "Addon A",
            "creator": "Someone",
            "size": 2048,
            "packageName": "addon-a",
            "packageVersion": "1.0.0",
            "minimumGameVersion": "1.0.0",
            "items": [{"type": "airport", "content": "KJFK", "revision": 1}]
        }
    ]"#;

    #[test]
    fn missing_file_is_not_an_error() {
        let mut conn = open_cache_in_memory().expect("open failed");
        let outcome = migrate_legacy_addons(&mut conn, &temp_file("missing"))
            .expect("migration errored");
        assert_eq!(outcome, MigrationOutcome::NotPresent);
    }

    #[test]
    fn valid_file_is_imported_then_deleted() {
        let mut conn = open_cache_in_memory().expect("open failed");
        let path = temp_file("valid");
        fs::write(&path, LEGACY_JSON).expect("failed to write legacy file");

        let outcome = migrate_legacy_addons(&mut conn, &path).expect("migration errored");
        assert_eq!(outcome, MigrationOutcome::Migrated(1));
        assert!(!path.exists());

        let loaded = load_addons(&conn).expect("load failed").expect("cache empty");
        assert_eq!(loaded[0].package_name, "addon-a");
        assert_eq!(loaded[0].items.len(), 1);

        // Second run is a no-op.
        let outcome = migrate_legacy_addons(&mut conn, &path).expect("migration errored");
        assert_eq!(outcome, MigrationOutcome::NotPresent);
    }

    #[test]
    fn unparseable_file_is_discarded_and_deleted() {
        let mut conn = open_cache_in_memory().expect("open failed");
        let path = temp_file("garbage");
        fs::write(&path, "not json at all").expect("failed to write legacy file");

        let outcome = migrate_legacy_addons(&mut conn, &path).expect("migration errored");
        assert!(matches!(outcome, MigrationOutcome::Discarded(_)));
        assert!(!path.exists());
        assert!(load_addons(&conn).expect("load failed").is_none());
    }

    #[test]
    fn empty_list_is_discarded_without_touching_the_cache() {
        let mut conn = open_cache_in_memory().expect("open failed");
        let path = temp_file("empty");
        fs::write(&path, "[]").expect("failed to write legacy file");

        let outcome = migrate_legacy_addons(&mut conn, &path).expect("migration errored");
        assert!(matches!(outcome, MigrationOutcome::Discarded(_)));
        assert!(!path.exists());
    }
}
