use crate::addon::{Addon, AddonItem, ReleaseNotes, ReleaseNotesLocale};
use serde_json::{Map, Value};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const CONTENT_HISTORY_FILE_NAME: &str = "ContentHistory.json";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a json object")]
    NotAnObject,
    #[error("missing or invalid field: {0}")]
    Field(&'static str),
}

/// Validated `manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub dependencies: Vec<String>,
    pub content_type: String,
    pub title: String,
    pub manufacturer: String,
    pub creator: String,
    pub package_version: String,
    pub minimum_game_version: String,
    pub release_notes: Option<ReleaseNotes>,
}

/// Validated `ContentHistory.json` contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHistory {
    pub package_name: String,
    pub items: Vec<AddonItem>,
}

fn required_str(obj: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecodeError::Field(field))
}

fn decode_release_notes(value: &Value) -> Result<ReleaseNotes, DecodeError> {
    let neutral = value
        .get("neutral")
        .and_then(Value::as_object)
        .ok_or(DecodeError::Field("release_notes.neutral"))?;
    Ok(ReleaseNotes {
        neutral: ReleaseNotesLocale {
            last_update: required_str(neutral, "LastUpdate")
                .map_err(|_| DecodeError::Field("release_notes.neutral.LastUpdate"))?,
            older_history: required_str(neutral, "OlderHistory")
                .map_err(|_| DecodeError::Field("release_notes.neutral.OlderHistory"))?,
        },
    })
}

pub fn decode_manifest(text: &str) -> Result<Manifest, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let dependencies = obj
        .get("dependencies")
        .and_then(Value::as_array)
        .ok_or(DecodeError::Field("dependencies"))?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or(DecodeError::Field("dependencies"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let release_notes = match obj.get("release_notes") {
        None | Some(Value::Null) => None,
        Some(value) => Some(decode_release_notes(value)?),
    };

    Ok(Manifest {
        dependencies,
        content_type: required_str(obj, "content_type")?,
        title: required_str(obj, "title")?,
        manufacturer: required_str(obj, "manufacturer")?,
        creator: required_str(obj, "creator")?,
        package_version: required_str(obj, "package_version")?,
        minimum_game_version: required_str(obj, "minimum_game_version")?,
        release_notes,
    })
}

pub fn decode_content_history(text: &str) -> Result<ContentHistory, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let package_name = required_str(obj, "package-name")?;
    let entries = obj
        .get("items")
        .and_then(Value::as_array)
        .ok_or(DecodeError::Field("items"))?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.as_object().ok_or(DecodeError::Field("items"))?;
        items.push(AddonItem {
            item_type: required_str(entry, "type")
                .map_err(|_| DecodeError::Field("items[].type"))?,
            content: required_str(entry, "content")
                .map_err(|_| DecodeError::Field("items[].content"))?,
            revision: entry
                .get("revision")
                .and_then(Value::as_i64)
                .ok_or(DecodeError::Field("items[].revision"))?,
        });
    }

    Ok(ContentHistory {
        package_name,
        items,
    })
}

/// Combines the two validated documents and the measured package size into
/// the normalized addon record.
pub fn build_addon(manifest: Manifest, history: ContentHistory, size: u64) -> Addon {
    Addon {
        title: manifest.title,
        creator: manifest.creator,
        size,
        package_name: history.package_name,
        package_version: manifest.package_version,
        minimum_game_version: manifest.minimum_game_version,
        release_notes: manifest.release_notes,
        items: history.items,
    }
}
