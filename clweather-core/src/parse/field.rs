//! Field-level extraction from loosely typed JSON records.
//!
//! The upstream API mixes numbers, numeric strings, sentinel strings and
//! nulls for the same field depending on station and instrument. Every
//! value goes through [`RawField`] first and is narrowed to a domain type
//! right away; a field that does not fit degrades to absent on its own.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::model::{CloudLayer, Reading, Visibility, WindDirection};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawField<'a> {
    Absent,
    Null,
    Number(f64),
    Text(&'a str),
    /// Arrays, objects, booleans.
    Other(&'a Value),
}

impl<'a> RawField<'a> {
    pub(crate) fn lookup(record: &'a Value, key: &str) -> Self {
        match record.get(key) {
            None => RawField::Absent,
            Some(Value::Null) => RawField::Null,
            Some(Value::Number(n)) => n.as_f64().map_or(RawField::Absent, RawField::Number),
            Some(Value::String(s)) => RawField::Text(s.as_str()),
            Some(other) => RawField::Other(other),
        }
    }

    /// Numeric value, accepting numeric strings.
    fn number(&self) -> Option<f64> {
        match self {
            RawField::Number(n) => Some(*n),
            RawField::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

pub(crate) fn reading(record: &Value, key: &str) -> Reading {
    let field = RawField::lookup(record, key);
    match field {
        RawField::Null => Reading::Null,
        RawField::Absent => Reading::Missing,
        _ => field.number().map_or(Reading::Missing, Reading::Value),
    }
}

pub(crate) fn number(record: &Value, key: &str) -> Option<f64> {
    RawField::lookup(record, key).number()
}

/// Non-empty trimmed string.
pub(crate) fn text(record: &Value, key: &str) -> Option<String> {
    match RawField::lookup(record, key) {
        RawField::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

pub(crate) fn wind_direction(record: &Value, key: &str) -> Option<WindDirection> {
    let field = RawField::lookup(record, key);
    if let RawField::Text(s) = &field {
        if s.trim().eq_ignore_ascii_case("VRB") {
            return Some(WindDirection::Variable);
        }
    }
    field
        .number()
        .filter(|deg| (0.0..=360.0).contains(deg))
        .map(|deg| WindDirection::Degrees(deg.round() as u16))
}

pub(crate) fn knots(record: &Value, key: &str) -> Option<u16> {
    number(record, key)
        .filter(|kt| *kt >= 0.0 && *kt <= f64::from(u16::MAX))
        .map(|kt| kt.round() as u16)
}

/// Gusts are only kept when positive.
pub(crate) fn gust(record: &Value, key: &str) -> Option<u16> {
    knots(record, key).filter(|kt| *kt > 0)
}

pub(crate) fn visibility(record: &Value, key: &str) -> Visibility {
    match RawField::lookup(record, key) {
        RawField::Number(sm) if sm >= 0.0 => Visibility::StatuteMiles(sm),
        RawField::Text(s) => parse_statute_miles(s).map_or(Visibility::TenOrMore, Visibility::StatuteMiles),
        _ => Visibility::TenOrMore,
    }
}

/// `"3"`, `"1/2"`, `"1 1/2"`. Open-ended values such as `"10+"` yield `None`.
fn parse_statute_miles(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches("SM");
    if s.ends_with('+') {
        return None;
    }

    let mut total = 0.0;
    for part in s.split_whitespace() {
        total += match part.split_once('/') {
            Some((num, den)) => {
                let den: f64 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num.parse::<f64>().ok()? / den
            }
            None => part.parse::<f64>().ok()?,
        };
    }
    (total >= 0.0 && !s.is_empty()).then_some(total)
}

/// Unix seconds or an RFC 3339 string. Zero and unparseable values are
/// treated as unavailable.
pub(crate) fn timestamp(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    match RawField::lookup(record, key) {
        RawField::Number(secs) => from_unix(secs as i64),
        RawField::Text(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return from_unix(secs);
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|ndt| ndt.and_utc())
                })
        }
        _ => None,
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Cloud layers in source order. Entries without a cover code are dropped.
pub(crate) fn clouds(record: &Value, key: &str) -> Vec<CloudLayer> {
    let RawField::Other(Value::Array(layers)) = RawField::lookup(record, key) else {
        return Vec::new();
    };

    layers
        .iter()
        .filter_map(|layer| {
            let cover = text(layer, "cover")?.to_uppercase();
            let base_ft = number(layer, "base")
                .filter(|ft| *ft >= 0.0)
                .map(|ft| ft.round() as u32);
            Some(CloudLayer { cover, base_ft })
        })
        .collect()
}

/// Space separated present-weather groups, e.g. `"-RA BR"`.
pub(crate) fn weather(record: &Value, key: &str) -> Vec<String> {
    text(record, key)
        .map(|wx| wx.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_distinguishes_shapes() {
        let rec = json!({"a": null, "b": 0, "c": "VRB", "d": [1]});
        assert_eq!(RawField::lookup(&rec, "a"), RawField::Null);
        assert_eq!(RawField::lookup(&rec, "b"), RawField::Number(0.0));
        assert_eq!(RawField::lookup(&rec, "c"), RawField::Text("VRB"));
        assert!(matches!(RawField::lookup(&rec, "d"), RawField::Other(_)));
        assert_eq!(RawField::lookup(&rec, "zzz"), RawField::Absent);
    }

    #[test]
    fn reading_keeps_null_zero_and_missing_apart() {
        let rec = json!({"zero": 0, "null": null, "str": "12.5", "bad": true});
        assert_eq!(reading(&rec, "zero"), Reading::Value(0.0));
        assert_eq!(reading(&rec, "null"), Reading::Null);
        assert_eq!(reading(&rec, "absent"), Reading::Missing);
        assert_eq!(reading(&rec, "str"), Reading::Value(12.5));
        assert_eq!(reading(&rec, "bad"), Reading::Missing);
    }

    #[test]
    fn visibility_fractions_and_open_ended() {
        assert_eq!(parse_statute_miles("1/2"), Some(0.5));
        assert_eq!(parse_statute_miles("1 1/2"), Some(1.5));
        assert_eq!(parse_statute_miles("6+"), None);
        assert_eq!(parse_statute_miles("10+"), None);
        assert_eq!(parse_statute_miles(""), None);
        assert_eq!(parse_statute_miles("1/0"), None);
    }

    #[test]
    fn timestamp_accepts_unix_and_rfc3339() {
        let rec = json!({
            "unix": 1_761_998_400,
            "iso": "2025-11-01T12:00:00.000Z",
            "zero": 0,
            "junk": "soon",
        });
        let expected = DateTime::from_timestamp(1_761_998_400, 0);
        assert_eq!(timestamp(&rec, "unix"), expected);
        assert_eq!(timestamp(&rec, "iso"), expected);
        assert_eq!(timestamp(&rec, "zero"), None);
        assert_eq!(timestamp(&rec, "junk"), None);
    }

    #[test]
    fn wind_direction_out_of_range_is_absent() {
        let rec = json!({"a": 400, "b": "270", "c": "vrb"});
        assert_eq!(wind_direction(&rec, "a"), None);
        assert_eq!(wind_direction(&rec, "b"), Some(WindDirection::Degrees(270)));
        assert_eq!(wind_direction(&rec, "c"), Some(WindDirection::Variable));
    }

    #[test]
    fn clouds_skip_layers_without_cover() {
        let rec = json!({"clouds": [{"base": 1000}, {"cover": "ovc", "base": "800"}, {"cover": "CLR"}]});
        assert_eq!(
            clouds(&rec, "clouds"),
            vec![
                CloudLayer { cover: "OVC".into(), base_ft: Some(800) },
                CloudLayer { cover: "CLR".into(), base_ft: None },
            ]
        );
    }
}
