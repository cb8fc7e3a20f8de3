//! Number and duration formatting for presenters.

const SUFFIXES: [(f64, &str); 5] = [
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Money with two decimals and a magnitude suffix: `999.50`, `1.50K`, `2.00M`.
pub fn format_money(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_money(-n));
    }
    for (scale, suffix) in SUFFIXES {
        if n >= scale {
            return format!("{:.2}{}", n / scale, suffix);
        }
    }
    format!("{:.2}", n)
}

/// `1h 2m 3s`, `2m 3s` or `3s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_small_values() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(999.5), "999.50");
    }

    #[test]
    fn money_suffixes() {
        assert_eq!(format_money(1_500.0), "1.50K");
        assert_eq!(format_money(2_000_000.0), "2.00M");
        assert_eq!(format_money(3.25e9), "3.25B");
        assert_eq!(format_money(4e12), "4.00T");
        assert_eq!(format_money(5e15), "5.00Q");
        assert_eq!(format_money(5e18), "5000.00Q");
    }

    #[test]
    fn money_negative() {
        assert_eq!(format_money(-1_500.0), "-1.50K");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3_723), "1h 2m 3s");
        assert_eq!(format_duration(7_200), "2h 0m 0s");
    }
}
