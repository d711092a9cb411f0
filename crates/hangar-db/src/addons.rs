use crate::connection::CacheError;
use hangar_core::addon::{Addon, AddonItem, ReleaseNotes, ReleaseNotesLocale};
use rusqlite::{params, Connection};

/// Replaces the entire addon catalog in one transaction: existing items and
/// addons are deleted, then the new generation is inserted with item order
/// preserved. Any insert failure (a duplicate package name included) rolls
/// the whole replacement back, leaving the prior generation intact.
pub fn save_addons(conn: &mut Connection, addons: &[Addon]) -> Result<(), CacheError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM addon_items", [])?;
    tx.execute("DELETE FROM addons", [])?;
    {
        let mut insert_addon = tx.prepare(
            "INSERT INTO addons (title, creator, size, package_name, package_version, \
             minimum_game_version, release_notes_last_update, release_notes_older_history) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let mut insert_item = tx.prepare(
            "INSERT INTO addon_items (addon_id, type, content, revision) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for addon in addons {
            let notes = addon.release_notes.as_ref();
            insert_addon.execute(params![
                addon.title,
                addon.creator,
                addon.size as i64,
                addon.package_name,
                addon.package_version,
                addon.minimum_game_version,
                notes.map(|notes| notes.neutral.last_update.as_str()),
                notes.map(|notes| notes.neutral.older_history.as_str()),
            ])?;
            let addon_id = tx.last_insert_rowid();
            for item in &addon.items {
                insert_item.execute(params![
                    addon_id,
                    item.item_type,
                    item.content,
                    item.revision
                ])?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}

/// Loads the full catalog with items populated per addon, or `None` when the
/// addon table is empty (distinct from an addon that simply has no items).
pub fn load_addons(conn: &Connection) -> Result<Option<Vec<Addon>>, CacheError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, creator, size, package_name, package_version, minimum_game_version, \
         release_notes_last_update, release_notes_older_history FROM addons ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        let last_update: Option<String> = row.get(7)?;
        let older_history: Option<String> = row.get(8)?;
        let release_notes = last_update.map(|last_update| ReleaseNotes {
            neutral: ReleaseNotesLocale {
                last_update,
                older_history: older_history.unwrap_or_default(),
            },
        });
        Ok((
            row.get::<_, i64>(0)?,
            Addon {
                title: row.get(1)?,
                creator: row.get(2)?,
                size: row.get::<_, i64>(3)? as u64,
                package_name: row.get(4)?,
                package_version: row.get(5)?,
                minimum_game_version: row.get(6)?,
                release_notes,
                items: Vec::new(),
            },
        ))
    })?;
    let addon_rows = rows.collect::<Result<Vec<_>, _>>()?;
    if addon_rows.is_empty() {
        return Ok(None);
    }

    let mut item_stmt = conn.prepare(
        "SELECT type, content, revision FROM addon_items WHERE addon_id = ?1 ORDER BY id",
    )?;
    let mut addons = Vec::with_capacity(addon_rows.len());
    for (id, mut addon) in addon_rows {
        let items = item_stmt.query_map(params![id], |row| {
            Ok(AddonItem {
                item_type: row.get(0)?,
                content: row.get(1)?,
                revision: row.get(2)?,
            })
        })?;
        for item in items {
            addon.items.push(item?);
        }
        addons.push(addon);
    }
    Ok(Some(addons))
}
