use serde_json::Value;

use crate::{
    error::ParseError,
    model::{
        Bulletin, BulletinKind, ChangeType, FlightCategory, Forecast, ForecastPeriod, Reading,
        UNKNOWN_STATION, Visibility, Wind,
    },
    units::normalize_pressure_inhg,
};

mod field;

/// Parse one station's payload for the given kind.
pub fn parse(bytes: &[u8], kind: BulletinKind) -> Result<Bulletin, ParseError> {
    match kind {
        BulletinKind::Metar => parse_metar(bytes),
        BulletinKind::Taf => parse_taf(bytes),
    }
}

pub fn parse_metar(bytes: &[u8]) -> Result<Bulletin, ParseError> {
    let doc = decode(bytes)?;
    let rec = first_record(&doc, BulletinKind::Metar)?;

    let observed_at = field::timestamp(rec, "obsTime").or_else(|| field::timestamp(rec, "reportTime"));

    Ok(Bulletin {
        kind: BulletinKind::Metar,
        station_id: station_id(rec),
        station_name: field::text(rec, "name"),
        raw_text: field::text(rec, "rawOb").unwrap_or_default(),
        observed_at,
        temperature: field::reading(rec, "temp"),
        dewpoint: field::reading(rec, "dewp"),
        wind: wind(rec),
        visibility: field::visibility(rec, "visib"),
        pressure_inhg: field::number(rec, "altim")
            .filter(|p| *p > 0.0)
            .map(normalize_pressure_inhg),
        clouds: field::clouds(rec, "clouds"),
        weather: field::weather(rec, "wxString"),
        flight_category: field::text(rec, "fltCat").map(|c| FlightCategory::parse(&c)),
        forecast: None,
    })
}

pub fn parse_taf(bytes: &[u8]) -> Result<Bulletin, ParseError> {
    let doc = decode(bytes)?;
    let rec = first_record(&doc, BulletinKind::Taf)?;

    let periods = match rec.get("fcsts") {
        Some(Value::Array(items)) => items.iter().map(forecast_period).collect(),
        _ => Vec::new(),
    };

    Ok(Bulletin {
        kind: BulletinKind::Taf,
        station_id: station_id(rec),
        station_name: field::text(rec, "name"),
        raw_text: field::text(rec, "rawTAF").unwrap_or_default(),
        observed_at: field::timestamp(rec, "issueTime"),
        temperature: Reading::Missing,
        dewpoint: Reading::Missing,
        wind: Wind::default(),
        visibility: Visibility::default(),
        pressure_inhg: None,
        clouds: Vec::new(),
        weather: Vec::new(),
        flight_category: None,
        forecast: Some(Forecast {
            valid_from: field::timestamp(rec, "validTimeFrom"),
            valid_to: field::timestamp(rec, "validTimeTo"),
            periods,
        }),
    })
}

fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidEncoding(e.to_string()))
}

/// The API answers with an array; only its first element matters.
fn first_record(doc: &Value, kind: BulletinKind) -> Result<&Value, ParseError> {
    let record = match doc {
        Value::Array(items) => items.first().filter(|v| v.is_object()),
        Value::Object(_) => Some(doc),
        _ => None,
    };
    record.ok_or(ParseError::NoData(kind))
}

fn station_id(rec: &Value) -> String {
    field::text(rec, "icaoId")
        .map(|id| id.to_uppercase())
        .unwrap_or_else(|| UNKNOWN_STATION.to_string())
}

fn wind(rec: &Value) -> Wind {
    Wind {
        direction: field::wind_direction(rec, "wdir"),
        speed_kt: field::knots(rec, "wspd"),
        gust_kt: field::gust(rec, "wgst"),
    }
}

fn forecast_period(rec: &Value) -> ForecastPeriod {
    ForecastPeriod {
        change: change_type(rec),
        start: field::timestamp(rec, "timeFrom"),
        end: field::timestamp(rec, "timeTo"),
        wind: wind(rec),
        visibility: field::visibility(rec, "visib"),
        clouds: field::clouds(rec, "clouds"),
        weather: field::weather(rec, "wxString"),
    }
}

fn change_type(rec: &Value) -> ChangeType {
    let probability = field::number(rec, "probability")
        .filter(|p| *p > 0.0 && *p <= 100.0)
        .map(|p| p.round() as u8);
    if let Some(pct) = probability {
        return ChangeType::Probability(pct);
    }

    match field::text(rec, "fcstChange").map(|c| c.to_uppercase()).as_deref() {
        None => ChangeType::Base,
        Some("FM") => ChangeType::From,
        Some("TEMPO") => ChangeType::Tempo,
        Some("BECMG") => ChangeType::Becoming,
        Some(other) => ChangeType::Other(other.to_string()),
    }
}
