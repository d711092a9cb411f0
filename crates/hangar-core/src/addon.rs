use serde::{Deserialize, Serialize};

/// One discovered addon installation. A fresh set is built on every scan and
/// replaces the previous generation wholesale; records are never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub title: String,
    pub creator: String,
    pub size: u64,
    pub package_name: String,
    pub package_version: String,
    pub minimum_game_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,
    #[serde(default)]
    pub items: Vec<AddonItem>,
}

/// A content item owned by exactly one addon. Item order within an addon is
/// the order listed in the content-history file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddonItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub content: String,
    pub revision: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub neutral: ReleaseNotesLocale,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseNotesLocale {
    #[serde(rename = "LastUpdate")]
    pub last_update: String,
    #[serde(rename = "OlderHistory")]
    pub older_history: String,
}

impl AddonItem {
    /// Airport items carry an ICAO code in `content`. The type tag is
    /// free-form, so the match is a case-insensitive substring test.
    pub fn is_airport(&self) -> bool {
        self.item_type.to_ascii_lowercase().contains("airport")
    }
}

impl Addon {
    /// ICAO codes of every airport-typed item, in item order.
    pub fn airport_codes(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.is_airport())
            .map(|item| item.content.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::addon::{Addon, AddonItem};

    fn item(item_type: &str, content: &str) -> AddonItem {
        AddonItem {
            item_type: item_type.to_string(),
            content: content.to_string(),
            revision: 1,
        }
    }

    #[test]
    fn airport_items_match_case_insensitively() {
        assert!(item("airport", "KJFK").is_airport());
        assert!(item("Airport", "KJFK").is_airport());
        assert!(item("AIRPORT_SCENERY", "KJFK").is_airport());
        assert!(!item("livery", "N123AB").is_airport());
    }

    #[test]
    fn airport_codes_preserve_item_order() {
        let addon = Addon {
            title: "NYC Pack".to_string(),
            creator: "Test Creator".to_string(),
            size: 1024,
            package_name: "nyc-pack".to_string(),
            package_version: "1.0.0".to_string(),
            minimum_game_version: "1.0.0".to_string(),
            release_notes: None,
            items: vec![
                item("airport", "KJFK"),
                item("scenery", "Manhattan"),
                item("Airport", "KLGA"),
            ],
        };
        assert_eq!(addon.airport_codes(), vec!["KJFK", "KLGA"]);
    }

    #[test]
    fn legacy_json_uses_camel_case_field_names() {
        let json = r#"{
            "title": "Addon A",
            "creator": "Someone",
            "size": 2048,
            "packageName": "addon-a",
            "packageVersion": "2.1.0",
            "minimumGameVersion": "1.30.0",
            "items": [{"type": "airport", "content": "EGLL", "revision": 3}]
        }"#;
        let addon: Addon = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(addon.package_name, "addon-a");
        assert_eq!(addon.minimum_game_version, "1.30.0");
        assert!(addon.release_notes.is_none());
        assert_eq!(addon.items.len(), 1);
        assert_eq!(addon.items[0].item_type, "airport");

        let round = serde_json::to_string(&addon).expect("serialize failed");
        assert!(round.contains("\"packageName\""));
        assert!(round.contains("\"type\""));
    }
}
