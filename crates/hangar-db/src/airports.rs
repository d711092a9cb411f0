use crate::connection::CacheError;
use chrono::{DateTime, Utc};
use hangar_core::airport::Airport;
use rusqlite::{params, params_from_iter, Connection, ToSql};

/// Rows per multi-row INSERT. At ten columns a row this stays well under
/// SQLite's bound on parameters per statement.
pub const AIRPORT_INSERT_BATCH: usize = 500;

const AIRPORT_COLUMNS: usize = 10;

const REFRESHED_AT_KEY: &str = "airports_refreshed_at";

/// Replaces the airport reference table wholesale. Batches are physically
/// chunked but run inside one transaction, so the caller sees an atomic
/// replacement; a failure partway leaves the previous dataset in place.
pub fn save_airports(conn: &mut Connection, airports: &[Airport]) -> Result<(), CacheError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM airports", [])?;
    for batch in airports.chunks(AIRPORT_INSERT_BATCH) {
        let placeholders: Vec<String> = (0..batch.len())
            .map(|row| {
                let base = row * AIRPORT_COLUMNS;
                let slots: Vec<String> =
                    (1..=AIRPORT_COLUMNS).map(|col| format!("?{}", base + col)).collect();
                format!("({})", slots.join(", "))
            })
            .collect();
        let sql = format!(
            "INSERT INTO airports (ident, type, name, latitude_deg, longitude_deg, elevation_ft, \
             iso_country, municipality, icao_code, iata_code) VALUES {}",
            placeholders.join(", ")
        );
        let mut stmt = tx.prepare(&sql)?;
        let mut values: Vec<&dyn ToSql> = Vec::with_capacity(batch.len() * AIRPORT_COLUMNS);
        for airport in batch {
            values.push(&airport.ident);
            values.push(&airport.airport_type);
            values.push(&airport.name);
            values.push(&airport.latitude_deg);
            values.push(&airport.longitude_deg);
            values.push(&airport.elevation_ft);
            values.push(&airport.iso_country);
            values.push(&airport.municipality);
            values.push(&airport.icao_code);
            values.push(&airport.iata_code);
        }
        stmt.execute(&values[..])?;
    }
    set_meta(&tx, REFRESHED_AT_KEY, &Utc::now().to_rfc3339())?;
    tx.commit()?;
    Ok(())
}

/// True iff any reference rows are present. Gates airport-dependent features
/// without loading any rows.
pub fn has_airport_data(conn: &Connection) -> Result<bool, CacheError> {
    let count: i64 = conn.query_row("SELECT count(*) FROM airports", [], |row| row.get(0))?;
    Ok(count > 0)
}

/// Looks up stored airports by ICAO code. Unmatched codes are simply absent
/// from the result; an empty input never touches the store.
pub fn airports_by_icao_codes(
    conn: &Connection,
    codes: &[String],
) -> Result<Vec<Airport>, CacheError> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders: Vec<String> = (1..=codes.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT ident, type, name, latitude_deg, longitude_deg, elevation_ft, iso_country, \
         municipality, icao_code, iata_code FROM airports WHERE icao_code IN ({})",
        placeholders.join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(codes.iter()), |row| {
        Ok(Airport {
            ident: row.get(0)?,
            airport_type: row.get(1)?,
            name: row.get(2)?,
            latitude_deg: row.get(3)?,
            longitude_deg: row.get(4)?,
            elevation_ft: row.get(5)?,
            iso_country: row.get(6)?,
            municipality: row.get(7)?,
            icao_code: row.get(8)?,
            iata_code: row.get(9)?,
        })
    })?;
    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// When the reference table was last rebuilt, if ever.
pub fn airports_refreshed_at(conn: &Connection) -> Result<Option<DateTime<Utc>>, CacheError> {
    let Some(raw) = get_meta(conn, REFRESHED_AT_KEY)? else {
        return Ok(None);
    };
    Ok(DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc)))
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<(), CacheError> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>, CacheError> {
    let mut stmt = conn.prepare("SELECT value FROM meta WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}
