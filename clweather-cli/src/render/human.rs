use std::io::{self, Write};

use chrono::{DateTime, Utc};
use clweather_core::{
    model::{Bulletin, ChangeType, CloudLayer, ForecastPeriod, Reading, Wind, WindDirection},
    units::{celsius_to_fahrenheit, hundreds_of_feet},
};

use super::style::Palette;

pub const UNAVAILABLE: &str = "N/A";
pub const CLEAR: &str = "clear";

pub fn write_metar(out: &mut impl Write, b: &Bulletin, palette: Palette) -> io::Result<()> {
    let category = b
        .flight_category
        .as_ref()
        .map_or_else(|| UNAVAILABLE.to_string(), |c| palette.category(c));

    writeln!(
        out,
        "🛩️  {} METAR (Observed: {}) | FltCat: {}",
        station_title(b, palette),
        format_time(b.observed_at),
        category
    )?;
    writeln!(
        out,
        "🌡️   Temp/Dew: {} / {}",
        format_temperature(b.temperature),
        format_temperature(b.dewpoint)
    )?;
    writeln!(out, "💨   Wind: {}", format_wind(&b.wind))?;
    writeln!(out, "👁️   Vis: {} | Alt: {}", b.visibility, format_pressure(b.pressure_inhg))?;
    if !b.weather.is_empty() {
        writeln!(out, "🌧️   Weather: {}", b.weather.join(", "))?;
    }
    writeln!(out, "☁️   Clouds: {}", cloud_summary(&b.clouds))?;
    writeln!(out)
}

pub fn write_taf(out: &mut impl Write, b: &Bulletin, palette: Palette) -> io::Result<()> {
    let (valid_from, valid_to, periods) = match &b.forecast {
        Some(fc) => (fc.valid_from, fc.valid_to, fc.periods.as_slice()),
        None => (None, None, &[][..]),
    };

    writeln!(
        out,
        "📅  {} TAF (Issued: {} | Valid: {} to {})",
        station_title(b, palette),
        format_time(b.observed_at),
        format_time(valid_from),
        format_time(valid_to)
    )?;

    for period in periods {
        write_period(out, period)?;
    }
    writeln!(out)
}

/// Periods with no start time are skipped.
fn write_period(out: &mut impl Write, p: &ForecastPeriod) -> io::Result<()> {
    let Some(start) = p.start else {
        return Ok(());
    };

    let prefix = match &p.change {
        ChangeType::Base => String::new(),
        other => format!("{} ", other.label()),
    };
    let end = p
        .end
        .map(|end| format!(" → {}", format_time(Some(end))))
        .unwrap_or_default();

    writeln!(
        out,
        "  {prefix}{}{end}: Wind {} | Vis {}",
        format_time(Some(start)),
        format_wind(&p.wind),
        p.visibility
    )?;
    if !p.weather.is_empty() {
        writeln!(out, "     Weather: {}", p.weather.join(", "))?;
    }
    if !p.clouds.is_empty() {
        writeln!(out, "     Clouds: {}", cloud_summary(&p.clouds))?;
    }
    Ok(())
}

fn station_title(b: &Bulletin, palette: Palette) -> String {
    let id = palette.heading(&b.station_id);
    match &b.station_name {
        Some(name) => format!("{id} ({name})"),
        None => id,
    }
}

pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| UNAVAILABLE.to_string(), |t| t.format("%Y-%m-%dT%H:%MZ").to_string())
}

pub fn format_temperature(reading: Reading) -> String {
    match reading {
        Reading::Value(c) => format!("{c:.1}°C ({:.1}°F)", celsius_to_fahrenheit(c)),
        Reading::Null | Reading::Missing => UNAVAILABLE.to_string(),
    }
}

fn format_pressure(inhg: Option<f64>) -> String {
    inhg.map_or_else(|| UNAVAILABLE.to_string(), |p| format!("{p:.2}inHg"))
}

pub fn format_wind(wind: &Wind) -> String {
    let Some(speed) = wind.speed_kt else {
        return UNAVAILABLE.to_string();
    };

    let mut s = match wind.direction {
        Some(dir @ WindDirection::Degrees(_)) => format!("{dir}° {speed}KT"),
        Some(WindDirection::Variable) => format!("VRB {speed}KT"),
        None => format!("{speed}KT"),
    };
    if let Some(gust) = wind.gust_kt {
        s.push_str(&format!(" G{gust}KT"));
    }
    s
}

/// `FEW030 BKN050`, in source order, or `clear` with no layers.
pub fn cloud_summary(clouds: &[CloudLayer]) -> String {
    if clouds.is_empty() {
        return CLEAR.to_string();
    }

    clouds
        .iter()
        .map(|layer| match layer.base_ft {
            Some(ft) => format!("{}{:03}", layer.cover, hundreds_of_feet(ft)),
            None => layer.cover.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(cover: &str, base_ft: Option<u32>) -> CloudLayer {
        CloudLayer { cover: cover.to_string(), base_ft }
    }

    #[test]
    fn zero_and_null_temperatures_differ() {
        assert_eq!(format_temperature(Reading::Value(0.0)), "0.0°C (32.0°F)");
        assert_eq!(format_temperature(Reading::Null), UNAVAILABLE);
        assert_eq!(format_temperature(Reading::Missing), UNAVAILABLE);
    }

    #[test]
    fn clouds_keep_order_and_floor_zero_base() {
        assert_eq!(
            cloud_summary(&[layer("FEW", Some(3000)), layer("BKN", Some(5000))]),
            "FEW030 BKN050"
        );
        assert_eq!(cloud_summary(&[layer("OVC", Some(0))]), "OVC001");
        assert_eq!(cloud_summary(&[layer("OVC", Some(8000)), layer("FEW", Some(1200))]), "OVC080 FEW012");
        assert_eq!(cloud_summary(&[layer("CLR", None)]), "CLR");
        assert_eq!(cloud_summary(&[]), CLEAR);
    }

    #[test]
    fn wind_formats() {
        let gusty = Wind {
            direction: Some(WindDirection::Degrees(270)),
            speed_kt: Some(10),
            gust_kt: Some(15),
        };
        assert_eq!(format_wind(&gusty), "270° 10KT G15KT");

        let variable = Wind { direction: Some(WindDirection::Variable), speed_kt: Some(3), gust_kt: None };
        assert_eq!(format_wind(&variable), "VRB 3KT");

        assert_eq!(format_wind(&Wind::default()), UNAVAILABLE);
    }

    #[test]
    fn time_formats_as_utc_minutes() {
        let t = DateTime::from_timestamp(1_761_998_400, 0);
        assert_eq!(format_time(t), "2025-11-01T12:00Z");
        assert_eq!(format_time(None), UNAVAILABLE);
    }
}
