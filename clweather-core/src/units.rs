//! Numeric conversions used by the parser and the renderers.

const HPA_PER_INHG: f64 = 33.8639;

/// Altimeter values above this are hectopascals, below it inches of mercury.
const HPA_THRESHOLD: f64 = 100.0;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa / HPA_PER_INHG
}

/// Normalize an altimeter setting of either unit to inches of mercury.
pub fn normalize_pressure_inhg(value: f64) -> f64 {
    if value > HPA_THRESHOLD { hpa_to_inhg(value) } else { value }
}

/// Cloud base in hundreds of feet, never below 1 so a surface layer
/// does not render as `000`.
pub fn hundreds_of_feet(feet: u32) -> u32 {
    (feet / 100).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_and_boiling_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn standard_pressure_converts() {
        let inhg = hpa_to_inhg(1013.25);
        assert!((inhg - 29.92).abs() < 0.01, "got {inhg}");
    }

    #[test]
    fn pressure_already_in_inhg_passes_through() {
        assert_eq!(normalize_pressure_inhg(29.92), 29.92);
        assert!((normalize_pressure_inhg(1013.0) - 29.91).abs() < 0.01);
    }

    #[test]
    fn cloud_base_is_floored_to_one_hundred_feet() {
        assert_eq!(hundreds_of_feet(0), 1);
        assert_eq!(hundreds_of_feet(50), 1);
        assert_eq!(hundreds_of_feet(3000), 30);
        assert_eq!(hundreds_of_feet(25_000), 250);
    }
}
