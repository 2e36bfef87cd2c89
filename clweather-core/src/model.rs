use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::{convert::TryFrom, fmt};

use crate::error::FetchError;

/// Station identifier used when a payload does not name one.
pub const UNKNOWN_STATION: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletinKind {
    Metar,
    Taf,
}

impl BulletinKind {
    /// Lowercase form, also the endpoint path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletinKind::Metar => "metar",
            BulletinKind::Taf => "taf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BulletinKind::Metar => "METAR",
            BulletinKind::Taf => "TAF",
        }
    }
}

impl fmt::Display for BulletinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for BulletinKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metar" => Ok(BulletinKind::Metar),
            "taf" => Ok(BulletinKind::Taf),
            _ => Err(anyhow::anyhow!(
                "Unknown bulletin kind '{value}'. Supported kinds: metar, taf."
            )),
        }
    }
}

/// Which bulletin kinds a run asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KindSelector {
    Metar,
    Taf,
    #[default]
    Both,
}

impl KindSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindSelector::Metar => "metar",
            KindSelector::Taf => "taf",
            KindSelector::Both => "both",
        }
    }

    pub const fn all() -> &'static [KindSelector] {
        &[KindSelector::Metar, KindSelector::Taf, KindSelector::Both]
    }

    /// Kinds to fetch, METAR first.
    pub fn kinds(&self) -> &'static [BulletinKind] {
        match self {
            KindSelector::Metar => &[BulletinKind::Metar],
            KindSelector::Taf => &[BulletinKind::Taf],
            KindSelector::Both => &[BulletinKind::Metar, BulletinKind::Taf],
        }
    }
}

impl fmt::Display for KindSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for KindSelector {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metar" => Ok(KindSelector::Metar),
            "taf" => Ok(KindSelector::Taf),
            "both" => Ok(KindSelector::Both),
            _ => Err(anyhow::anyhow!(
                "Unknown data type '{value}'. Supported types: metar, taf, both."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    #[default]
    Human,
    Raw,
    Json,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Human => "human",
            OutputMode::Raw => "raw",
            OutputMode::Json => "json",
        }
    }

    pub const fn all() -> &'static [OutputMode] {
        &[OutputMode::Human, OutputMode::Raw, OutputMode::Json]
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutputMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "human" => Ok(OutputMode::Human),
            "raw" => Ok(OutputMode::Raw),
            "json" => Ok(OutputMode::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown output format '{value}'. Supported formats: human, raw, json."
            )),
        }
    }
}

/// A numeric observation that keeps "reported as null" apart from
/// "not in the payload" and from a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Reading {
    #[default]
    Missing,
    Null,
    Value(f64),
}

impl Reading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => serializer.serialize_f64(*v),
            Reading::Missing | Reading::Null => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    Degrees(u16),
    /// Reported as `VRB`.
    Variable,
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindDirection::Degrees(d) => write!(f, "{d:03}"),
            WindDirection::Variable => f.write_str("VRB"),
        }
    }
}

impl Serialize for WindDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WindDirection::Degrees(d) => serializer.serialize_u16(*d),
            WindDirection::Variable => serializer.serialize_str("VRB"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Wind {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<WindDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kt: Option<u16>,
    /// Only set for a positive reported gust.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust_kt: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Visibility {
    /// Omitted or open-ended (`10+`, `6+`) in the source.
    #[default]
    TenOrMore,
    StatuteMiles(f64),
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::TenOrMore => f.write_str("10+SM"),
            Visibility::StatuteMiles(sm) => write!(f, "{sm}SM"),
        }
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visibility::TenOrMore => serializer.serialize_str("10+"),
            Visibility::StatuteMiles(sm) => serializer.serialize_f64(*sm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudLayer {
    /// FEW, SCT, BKN, OVC, CLR...
    pub cover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_ft: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
    Unrecognized(String),
}

impl FlightCategory {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "VFR" => FlightCategory::Vfr,
            "MVFR" => FlightCategory::Mvfr,
            "IFR" => FlightCategory::Ifr,
            "LIFR" => FlightCategory::Lifr,
            _ => FlightCategory::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
            FlightCategory::Unrecognized(s) => s,
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FlightCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// TAF change group of a forecast period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeType {
    /// The initial forecast, no change indicator.
    Base,
    From,
    Tempo,
    Becoming,
    Probability(u8),
    Other(String),
}

impl ChangeType {
    pub fn label(&self) -> String {
        match self {
            ChangeType::Base => "BASE".to_string(),
            ChangeType::From => "FM".to_string(),
            ChangeType::Tempo => "TEMPO".to_string(),
            ChangeType::Becoming => "BECMG".to_string(),
            ChangeType::Probability(pct) => format!("PROB{pct}"),
            ChangeType::Other(s) => s.clone(),
        }
    }
}

impl Serialize for ChangeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPeriod {
    pub change: ChangeType,
    /// Periods without a start are kept here but not rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub wind: Wind,
    pub visibility: Visibility,
    pub clouds: Vec<CloudLayer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<DateTime<Utc>>,
    pub periods: Vec<ForecastPeriod>,
}

/// One normalized METAR or TAF for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bulletin {
    pub kind: BulletinKind,
    pub station_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub raw_text: String,
    /// Observation time for a METAR, issue time for a TAF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Reading::is_missing")]
    pub temperature: Reading,
    #[serde(skip_serializing_if = "Reading::is_missing")]
    pub dewpoint: Reading,
    pub wind: Wind,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_inhg: Option<f64>,
    pub clouds: Vec<CloudLayer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_category: Option<FlightCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
}

/// A single (station, kind) pair to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationRequest {
    pub station: String,
    pub kind: BulletinKind,
}

/// Result of one [`StationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub station: String,
    pub kind: BulletinKind,
    pub result: Result<Vec<u8>, FetchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        for kind in [BulletinKind::Metar, BulletinKind::Taf] {
            assert_eq!(BulletinKind::try_from(kind.as_str()).unwrap(), kind);
            assert_eq!(BulletinKind::try_from(kind.label()).unwrap(), kind);
        }
        assert!(BulletinKind::try_from("both").is_err());
    }

    #[test]
    fn selector_roundtrip() {
        for sel in KindSelector::all() {
            let parsed = KindSelector::try_from(sel.as_str()).expect("roundtrip should succeed");
            assert_eq!(*sel, parsed);
        }
    }

    #[test]
    fn output_mode_roundtrip() {
        for mode in OutputMode::all() {
            let parsed = OutputMode::try_from(mode.as_str()).expect("roundtrip should succeed");
            assert_eq!(*mode, parsed);
        }
    }

    #[test]
    fn unknown_selector_error() {
        let err = KindSelector::try_from("pirep").unwrap_err();
        assert!(err.to_string().contains("Unknown data type"));
    }

    #[test]
    fn both_selector_lists_metar_first() {
        assert_eq!(KindSelector::Both.kinds(), &[BulletinKind::Metar, BulletinKind::Taf]);
    }

    #[test]
    fn flight_category_keeps_unrecognized_text() {
        assert_eq!(FlightCategory::parse("ifr"), FlightCategory::Ifr);
        let other = FlightCategory::parse("UNK");
        assert_eq!(other, FlightCategory::Unrecognized("UNK".to_string()));
        assert_eq!(other.to_string(), "UNK");
    }

    #[test]
    fn reading_serializes_value_and_null() {
        assert_eq!(serde_json::to_string(&Reading::Value(0.0)).unwrap(), "0.0");
        assert_eq!(serde_json::to_string(&Reading::Null).unwrap(), "null");
    }

    #[test]
    fn visibility_display() {
        assert_eq!(Visibility::TenOrMore.to_string(), "10+SM");
        assert_eq!(Visibility::StatuteMiles(1.5).to_string(), "1.5SM");
        assert_eq!(Visibility::StatuteMiles(10.0).to_string(), "10SM");
    }

    #[test]
    fn wind_direction_is_three_digits() {
        assert_eq!(WindDirection::Degrees(90).to_string(), "090");
        assert_eq!(WindDirection::Variable.to_string(), "VRB");
    }
}
