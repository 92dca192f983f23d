//! Display formatting for metric values
//!
//! Mirrors zh-CN locale output: comma thousands separators, fixed decimals,
//! `¥` for currency. Missing values render as [`NO_DATA`].

/// Display sentinel for missing values and empty windows
pub const NO_DATA: &str = "-";

/// Group digits with commas and fix the number of decimals
///
/// ```
/// use adboard_core::format::format_number;
///
/// assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_number(999.0, 0), "999");
/// assert_eq!(format_number(-4200.5, 1), "-4,200.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NO_DATA.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Avoid "-0.00" for values that round to zero
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn format_opt_number(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format_number(v, decimals))
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn format_currency(value: Option<f64>) -> String {
    value
        .map(|v| format!("¥{}", format_number(v, 2)))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Ratio to percentage: `0.0523` -> `5.23%`
pub fn format_percentage(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}%", format_number(v * 100.0, 2)))
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn format_count(value: u64) -> String {
    format_number(value as f64, 0)
}

/// Clock time of a millisecond timestamp in local time (`HH:MM`)
pub fn format_time(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Truncate to `max` chars, appending an ellipsis (char-safe for CJK names)
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Unicode mini-chart of `values`, resampled to at most `width` cells
///
/// Empty input renders as [`NO_DATA`].
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return NO_DATA.to_string();
    }

    let buckets: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        (0..width)
            .map(|i| {
                let start = i * values.len() / width;
                let end = ((i + 1) * values.len() / width).max(start + 1);
                let chunk = &values[start..end];
                chunk.iter().sum::<f64>() / chunk.len() as f64
            })
            .collect()
    };

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    buckets
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(100.0, 0), "100");
        assert_eq!(format_number(1000.0, 0), "1,000");
        assert_eq!(format_number(123456.0, 0), "123,456");
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(f64::NAN, 2), NO_DATA);
    }

    #[test]
    fn test_currency_and_percentage() {
        assert_eq!(format_currency(Some(12345.678)), "¥12,345.68");
        assert_eq!(format_currency(None), "-");
        assert_eq!(format_percentage(Some(0.0523)), "5.23%");
        assert_eq!(format_percentage(None), "-");
        assert_eq!(format_opt_number(Some(1.256), 2), "1.26");
    }

    #[test]
    fn test_truncate_cjk() {
        assert_eq!(truncate("视频广告 12", 10), "视频广告 12");
        assert_eq!(truncate("视频广告 12", 4), "视频广…");
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[], 10), NO_DATA);
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10).chars().count(), 3);
        assert_eq!(sparkline(&[0.0, 1.0], 10), "▁█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▅▅");
        let long: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(sparkline(&long, 20).chars().count(), 20);
    }
}
