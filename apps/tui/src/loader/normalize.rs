use crate::domain::{Category, GeoPoint, Record};
use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const DEFAULT_CREDIBILITY: u8 = 5;

/// Converts raw JSON objects into records. Entries without usable coordinates
/// are dropped and logged.
pub fn normalize(values: &[Value]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = normalize_one(index, value);
            if record.is_none() {
                tracing::warn!(index, %value, "skipping entry with invalid coordinates");
            }
            record
        })
        .collect()
}

fn normalize_one(index: usize, value: &Value) -> Option<Record> {
    let lat = coordinate(value, &["latitude", "lat", "y"], 1)?;
    let lng = coordinate(value, &["longitude", "lng", "x"], 0)?;
    let position = GeoPoint::new(lat, lng)?;

    let category = text(value, &["category"]).map_or(Category::Possible, |c| Category::infer(&c));
    let date = text(value, &["date"]);
    let year = date.as_deref().and_then(extract_year);

    Some(Record {
        id: text(value, &["id"]).unwrap_or_else(|| format!("point-{index}")),
        position,
        category,
        year,
        title: text(value, &["title", "name"]).unwrap_or_else(|| format!("Data Point {}", index + 1)),
        date: date
            .or_else(|| text(value, &["timestamp"]))
            .unwrap_or_else(|| "Unknown".to_string()),
        location: text(value, &["address", "place"])
            .unwrap_or_else(|| format!("{lat:.4}, {lng:.4}")),
        region: text(value, &["region", "area"]).unwrap_or_default(),
        country: text(value, &["country"]).unwrap_or_default(),
        credibility: credibility(value),
        description: text(value, &["description", "notes", "details"])
            .unwrap_or_else(|| "No description available".to_string()),
    })
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(1[0-9]{3}|2[0-9]{3}|[0-9]{1,3}\s?(?:BCE|BC|AD|CE))\b")
            .unwrap_or_else(|_| unreachable!("year pattern is a valid literal"))
    })
}

/// Pulls a year out of a loosely formatted date. A BC/BCE suffix makes it negative.
pub fn extract_year(date: &str) -> Option<i32> {
    if let Some(found) = year_pattern().captures(date).and_then(|c| c.get(1)) {
        let token = found.as_str().to_lowercase();
        let digits: String = token.chars().filter(char::is_ascii_digit).collect();
        let year: i32 = digits.parse().ok()?;
        return Some(if token.contains("bc") { -year } else { year });
    }
    parse_date_year(date)
}

fn parse_date_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(parsed.year());
    }
    ["%Y-%m-%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .map(|parsed| parsed.year())
}

fn coordinate(value: &Value, keys: &[&str], geo_index: usize) -> Option<f64> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(number))
        .or_else(|| {
            value
                .get("location")
                .and_then(|location| location.get("coordinates"))
                .and_then(|coordinates| coordinates.get(geo_index))
                .and_then(number)
        })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn credibility(value: &Value) -> u8 {
    value
        .get("credibility")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .map_or(DEFAULT_CREDIBILITY, |c| c.round().clamp(1.0, 10.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_plain_and_era_years() {
        assert_eq!(extract_year("June 24, 1947"), Some(1947));
        assert_eq!(extract_year("around 500 BC"), Some(-500));
        assert_eq!(extract_year("44 BCE"), Some(-44));
        assert_eq!(extract_year("800 AD"), Some(800));
        assert_eq!(extract_year("12/25/2003"), Some(2003));
    }

    #[test]
    fn falls_back_to_date_parsing() {
        assert_eq!(extract_year("0800-03-01"), Some(800));
        assert_eq!(extract_year("no date here"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn reads_alternate_field_names() {
        let values = vec![json!({
            "name": "Phoenix Lights",
            "y": "33.45",
            "x": -112.07,
            "category": "Likely craft",
            "date": "March 13, 1997",
            "place": "Phoenix",
            "area": "Southwest",
            "country": "USA",
            "credibility": 9,
            "notes": "V-shaped formation"
        })];

        let records = normalize(&values);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "point-0");
        assert_eq!(record.title, "Phoenix Lights");
        assert_eq!(record.category, Category::Probable);
        assert_eq!(record.year, Some(1997));
        assert_eq!(record.place_line(), "Phoenix, Southwest, USA");
        assert_eq!(record.credibility, 9);
        assert_eq!(record.description, "V-shaped formation");
        assert!((record.position.lat - 33.45).abs() < 1e-9);
    }

    #[test]
    fn reads_geojson_style_coordinates() {
        let values = vec![json!({
            "id": 17,
            "location": { "coordinates": [2.35, 48.85] }
        })];
        let records = normalize(&values);
        assert_eq!(records[0].id, "17");
        assert!((records[0].position.lng - 2.35).abs() < 1e-9);
        assert!((records[0].position.lat - 48.85).abs() < 1e-9);
        assert_eq!(records[0].location, "48.8500, 2.3500");
    }

    #[test]
    fn drops_invalid_coordinates() {
        let values = vec![
            json!({ "lat": 91.0, "lng": 0.0 }),
            json!({ "lat": "north", "lng": 0.0 }),
            json!({ "lng": 10.0 }),
            json!({ "lat": 0.0, "lng": 0.0, "category": "Confirmed" }),
        ];
        let records = normalize(&values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "point-3");
        assert_eq!(records[0].category, Category::Confirmed);
    }

    #[test]
    fn applies_defaults() {
        let records = normalize(&[json!({ "lat": 1, "lng": 2, "credibility": "high" })]);
        let record = &records[0];
        assert_eq!(record.title, "Data Point 1");
        assert_eq!(record.date, "Unknown");
        assert_eq!(record.year, None);
        assert_eq!(record.category, Category::Possible);
        assert_eq!(record.credibility, DEFAULT_CREDIBILITY);
        assert_eq!(record.description, "No description available");
    }
}
