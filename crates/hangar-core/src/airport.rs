/// One reference airport from the OurAirports dataset. Only `ident` and
/// `name` are guaranteed present; everything else is nullable in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub ident: String,
    pub airport_type: Option<String>,
    pub name: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    pub iso_country: Option<String>,
    pub municipality: Option<String>,
    pub icao_code: Option<String>,
    pub iata_code: Option<String>,
}

/// Splits one CSV line, treating commas inside double quotes as data.
/// Quote characters toggle the in-quotes state and are dropped.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Decodes the airports CSV into reference records. Columns are bound by
/// header name, so upstream reordering is harmless; a missing optional column
/// yields `None` on every record. Rows without an ident or name are skipped,
/// as are blank lines. No row aborts the decode.
pub fn parse_airports_csv(csv: &str) -> Vec<Airport> {
    let mut lines = csv.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<String> = split_csv_line(header)
        .iter()
        .map(|column| column.trim().to_string())
        .collect();
    let col = |name: &str| columns.iter().position(|column| column == name);

    let i_ident = col("ident");
    let i_type = col("type");
    let i_name = col("name");
    let i_lat = col("latitude_deg");
    let i_lon = col("longitude_deg");
    let i_elev = col("elevation_ft");
    let i_country = col("iso_country");
    let i_municipality = col("municipality");
    // The dataset publishes the ICAO identifier under gps_code.
    let i_icao = col("gps_code");
    let i_iata = col("iata_code");

    let mut airports = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = split_csv_line(line);

        let get = |idx: Option<usize>| -> Option<String> {
            let value = fields.get(idx?)?.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        let get_num = |idx: Option<usize>| -> Option<f64> {
            get(idx)?.parse().ok().filter(|value: &f64| value.is_finite())
        };

        let Some(ident) = get(i_ident) else {
            continue;
        };
        let Some(name) = get(i_name) else {
            continue;
        };

        airports.push(Airport {
            ident,
            airport_type: get(i_type),
            name,
            latitude_deg: get_num(i_lat),
            longitude_deg: get_num(i_lon),
            elevation_ft: get_num(i_elev).map(|feet| feet.round() as i64),
            iso_country: get(i_country),
            municipality: get(i_municipality),
            icao_code: get(i_icao),
            iata_code: get(i_iata),
        });
    }

    airports
}

#[cfg(test)]
mod tests {
    use crate::airport::{parse_airports_csv, split_csv_line};

    const HEADER: &str = "id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,gps_code,iata_code";

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let fields = split_csv_line(r#"1,KJFK,"John F Kennedy, Intl",US"#);
        assert_eq!(
            fields,
            vec!["1", "KJFK", "John F Kennedy, Intl", "US"]
        );
    }

    #[test]
    fn decodes_a_full_row() {
        let csv = format!(
            "{}\n3622,KJFK,large_airport,\"John F Kennedy International Airport\",40.6398,-73.7789,13,NA,US,US-NY,New York,yes,KJFK,JFK\n",
            HEADER
        );
        let airports = parse_airports_csv(&csv);
        assert_eq!(airports.len(), 1);
        let airport = &airports[0];
        assert_eq!(airport.ident, "KJFK");
        assert_eq!(airport.airport_type.as_deref(), Some("large_airport"));
        assert_eq!(airport.latitude_deg, Some(40.6398));
        assert_eq!(airport.elevation_ft, Some(13));
        assert_eq!(airport.iso_country.as_deref(), Some("US"));
        assert_eq!(airport.municipality.as_deref(), Some("New York"));
        assert_eq!(airport.icao_code.as_deref(), Some("KJFK"));
        assert_eq!(airport.iata_code.as_deref(), Some("JFK"));
    }

    #[test]
    fn unparseable_elevation_decodes_to_none() {
        let csv = format!(
            "{}\n1,EGLL,large_airport,Heathrow,51.47,-0.46,not-a-number,EU,GB,GB-ENG,London,yes,EGLL,LHR\n",
            HEADER
        );
        let airports = parse_airports_csv(&csv);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].elevation_ft, None);
    }

    #[test]
    fn non_finite_elevation_decodes_to_none() {
        for cell in ["NaN", "inf", "-inf"] {
            let csv = format!(
                "{}\n1,EGLL,large_airport,Heathrow,51.47,-0.46,{},EU,GB,GB-ENG,London,yes,EGLL,LHR\n",
                HEADER, cell
            );
            let airports = parse_airports_csv(&csv);
            assert_eq!(airports.len(), 1);
            assert_eq!(airports[0].elevation_ft, None, "cell {:?}", cell);
        }
    }

    #[test]
    fn quoted_header_cell_does_not_shift_column_bindings() {
        let csv = "\"name, localized\",ident,name,gps_code\nignored,EGLL,Heathrow,EGLL\n";
        let airports = parse_airports_csv(csv);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].ident, "EGLL");
        assert_eq!(airports[0].name, "Heathrow");
        assert_eq!(airports[0].icao_code.as_deref(), Some("EGLL"));
    }

    #[test]
    fn elevation_is_rounded_to_nearest_integer() {
        let csv = format!(
            "{}\n1,LOWI,medium_airport,Innsbruck,47.26,11.34,1906.6,EU,AT,AT-7,Innsbruck,yes,LOWI,INN\n",
            HEADER
        );
        let airports = parse_airports_csv(&csv);
        assert_eq!(airports[0].elevation_ft, Some(1907));
    }

    #[test]
    fn rows_missing_ident_or_name_are_skipped() {
        let csv = format!(
            "{}\n1,,large_airport,No Ident,0,0,0,NA,US,US-NY,,no,,\n2,ZZZZ,small_airport,,0,0,0,NA,US,US-NY,,no,,\n3,KLAX,large_airport,Los Angeles Intl,33.94,-118.40,125,NA,US,US-CA,Los Angeles,yes,KLAX,LAX\n",
            HEADER
        );
        let airports = parse_airports_csv(&csv);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].ident, "KLAX");
    }

    #[test]
    fn columns_are_bound_by_name_not_position() {
        let csv = "name,ident,gps_code\nHeathrow,EGLL,EGLL\n";
        let airports = parse_airports_csv(csv);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].ident, "EGLL");
        assert_eq!(airports[0].name, "Heathrow");
        assert_eq!(airports[0].icao_code.as_deref(), Some("EGLL"));
    }

    #[test]
    fn missing_optional_columns_decode_to_none() {
        let csv = "ident,name\nKJFK,JFK Intl\n";
        let airports = parse_airports_csv(csv);
        assert_eq!(airports.len(), 1);
        let airport = &airports[0];
        assert_eq!(airport.airport_type, None);
        assert_eq!(airport.latitude_deg, None);
        assert_eq!(airport.elevation_ft, None);
        assert_eq!(airport.icao_code, None);
        assert_eq!(airport.iata_code, None);
    }

    #[test]
    fn blank_lines_and_empty_input_are_tolerated() {
        assert!(parse_airports_csv("").is_empty());
        let csv = format!("{}\n\n   \n", HEADER);
        assert!(parse_airports_csv(&csv).is_empty());
    }
}
