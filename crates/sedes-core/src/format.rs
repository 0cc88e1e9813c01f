//! Human-readable formatting for durations, distances, and phone numbers.

/// `"N min"` under an hour, otherwise `"H h M min"` (or `"H h"` on the hour).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    if minutes < 60.0 {
        return format!("{} min", minutes.round() as u64);
    }
    let hours = (minutes / 60.0).floor() as u64;
    let mins = (minutes % 60.0).round() as u64;
    if mins > 0 {
        format!("{hours} h {mins} min")
    } else {
        format!("{hours} h")
    }
}

/// Metres below one kilometre, otherwise kilometres with one decimal.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_distance(km: f64) -> String {
    let km = km.max(0.0);
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as u64)
    } else {
        format!("{km:.1} km")
    }
}

/// Trims a phone field, mapping the dataset's placeholders (`S/N`, `S/C`)
/// and blanks to `None`.
#[must_use]
pub fn format_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed {
        "" => None,
        s if s.eq_ignore_ascii_case("S/N") || s.eq_ignore_ascii_case("S/C") => None,
        s => Some(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_under_an_hour() {
        assert_eq!(format_duration(0.0), "0 min");
        assert_eq!(format_duration(12.4), "12 min");
        assert_eq!(format_duration(59.4), "59 min");
    }

    #[test]
    fn duration_over_an_hour() {
        assert_eq!(format_duration(60.0), "1 h");
        assert_eq!(format_duration(95.0), "1 h 35 min");
        assert_eq!(format_duration(180.2), "3 h");
    }

    #[test]
    fn distance_switches_units_at_one_km() {
        assert_eq!(format_distance(0.3146), "315 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(12.345), "12.3 km");
    }

    #[test]
    fn phone_placeholders_are_dropped() {
        assert_eq!(format_phone("S/N"), None);
        assert_eq!(format_phone(" s/c "), None);
        assert_eq!(format_phone("   "), None);
        assert_eq!(format_phone(" 55 5346 8000 "), Some("55 5346 8000".to_string()));
    }
}
