//! Display formatting of raw measure values.

use crate::api::MetricType;

/// Minutes in one working day used by work-duration measures.
const WORK_DAY_MINUTES: u64 = 8 * 60;

/// Turns a raw measure value into the string shown to the user.
pub trait MeasureFormatter: Send + Sync {
    fn format(&self, raw: &str, metric_type: &MetricType) -> String;
}

/// Formatter matching the analysis server's web UI conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMeasureFormatter;

impl MeasureFormatter for DefaultMeasureFormatter {
    fn format(&self, raw: &str, metric_type: &MetricType) -> String {
        let trimmed = raw.trim();
        let number = trimmed.parse::<f64>().ok().filter(|n| n.is_finite());

        match (metric_type, number) {
            (MetricType::Int, Some(n)) => group_thousands(n.round(), 0),
            (MetricType::Float, Some(n)) => group_thousands(n, 1),
            (MetricType::Percent, Some(n)) => format!("{:.1}%", n),
            (MetricType::Millisec, Some(n)) => format_millis(n),
            (MetricType::WorkDur, Some(n)) => format_work_duration(n.round() as i64),
            (MetricType::Rating, Some(n)) => format_rating(n).unwrap_or_else(|| raw.to_string()),
            (MetricType::Level, _) => match trimmed {
                "OK" => "Passed".to_string(),
                "WARN" => "Warning".to_string(),
                "ERROR" => "Failed".to_string(),
                _ => raw.to_string(),
            },
            (MetricType::Bool, _) => match trimmed {
                "true" => "Yes".to_string(),
                "false" => "No".to_string(),
                _ => raw.to_string(),
            },
            _ => raw.to_string(),
        }
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn format_millis(ms: f64) -> String {
    if ms.abs() < 1000.0 {
        format!("{}ms", ms.round() as i64)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

fn format_work_duration(minutes: i64) -> String {
    if minutes == 0 {
        return "0".to_string();
    }

    let sign = if minutes < 0 { "-" } else { "" };
    let total = minutes.unsigned_abs();
    let days = total / WORK_DAY_MINUTES;
    let hours = (total % WORK_DAY_MINUTES) / 60;
    let mins = total % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 {
        parts.push(format!("{}min", mins));
    }
    format!("{}{}", sign, parts.join(" "))
}

fn format_rating(value: f64) -> Option<String> {
    let letter = match value.round() as i64 {
        1 => 'A',
        2 => 'B',
        3 => 'C',
        4 => 'D',
        5 => 'E',
        _ => return None,
    };
    Some(letter.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(raw: &str, metric_type: MetricType) -> String {
        DefaultMeasureFormatter.format(raw, &metric_type)
    }

    #[test]
    fn test_int_uses_thousands_separators() {
        assert_eq!(fmt("1234", MetricType::Int), "1,234");
        assert_eq!(fmt("1234567", MetricType::Int), "1,234,567");
        assert_eq!(fmt("12", MetricType::Int), "12");
        assert_eq!(fmt("-4500", MetricType::Int), "-4,500");
    }

    #[test]
    fn test_float_and_percent_keep_one_decimal() {
        assert_eq!(fmt("1234.54", MetricType::Float), "1,234.5");
        assert_eq!(fmt("81.26", MetricType::Percent), "81.3%");
        assert_eq!(fmt("100", MetricType::Percent), "100.0%");
    }

    #[test]
    fn test_millisec() {
        assert_eq!(fmt("250", MetricType::Millisec), "250ms");
        assert_eq!(fmt("1500", MetricType::Millisec), "1.5s");
    }

    #[test]
    fn test_work_duration_uses_eight_hour_days() {
        assert_eq!(fmt("0", MetricType::WorkDur), "0");
        assert_eq!(fmt("45", MetricType::WorkDur), "45min");
        assert_eq!(fmt("90", MetricType::WorkDur), "1h 30min");
        assert_eq!(fmt("480", MetricType::WorkDur), "1d");
        assert_eq!(fmt("545", MetricType::WorkDur), "1d 1h 5min");
        assert_eq!(fmt("-90", MetricType::WorkDur), "-1h 30min");
    }

    #[test]
    fn test_work_duration_saturates_huge_values() {
        let negative = fmt("-1e30", MetricType::WorkDur);
        assert!(negative.starts_with('-'));
        assert!(negative.ends_with("min"));
        assert!(fmt("1e30", MetricType::WorkDur).ends_with("min"));
    }

    #[test]
    fn test_rating_level_and_bool() {
        assert_eq!(fmt("1.0", MetricType::Rating), "A");
        assert_eq!(fmt("5", MetricType::Rating), "E");
        assert_eq!(fmt("9", MetricType::Rating), "9");
        assert_eq!(fmt("OK", MetricType::Level), "Passed");
        assert_eq!(fmt("ERROR", MetricType::Level), "Failed");
        assert_eq!(fmt("true", MetricType::Bool), "Yes");
        assert_eq!(fmt("false", MetricType::Bool), "No");
    }

    #[test]
    fn test_unparseable_values_pass_through() {
        assert_eq!(fmt("n/a", MetricType::Int), "n/a");
        assert_eq!(fmt("0=1;10=3", MetricType::Distrib), "0=1;10=3");
        assert_eq!(fmt("hello", MetricType::String), "hello");
    }
}
