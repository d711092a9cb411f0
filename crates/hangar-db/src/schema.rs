pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS addons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    creator TEXT NOT NULL,
    size INTEGER NOT NULL,
    package_name TEXT NOT NULL UNIQUE,
    package_version TEXT NOT NULL,
    minimum_game_version TEXT NOT NULL,
    release_notes_last_update TEXT,
    release_notes_older_history TEXT
);

CREATE TABLE IF NOT EXISTS addon_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    addon_id INTEGER NOT NULL REFERENCES addons(id) ON DELETE CASCADE,
    type TEXT NOT NULL,
    content TEXT NOT NULL,
    revision INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS airports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ident TEXT NOT NULL UNIQUE,
    type TEXT,
    name TEXT NOT NULL,
    latitude_deg REAL,
    longitude_deg REAL,
    elevation_ft INTEGER,
    iso_country TEXT,
    municipality TEXT,
    icao_code TEXT,
    iata_code TEXT
);

CREATE INDEX IF NOT EXISTS idx_airports_icao_code ON airports(icao_code);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
