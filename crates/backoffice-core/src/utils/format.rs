use chrono::{DateTime, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// First line of a long text, shortened for a table cell
pub fn excerpt(text: &str, max_len: usize) -> String {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let more = text.lines().filter(|l| !l.trim().is_empty()).count() > 1;
    let line = first_line.trim();
    if more && line.chars().count() + 3 <= max_len {
        format!("{}...", line)
    } else {
        truncate_string(line, max_len)
    }
}

/// Format a timestamp the way list screens show it
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => "-".to_string(),
    }
}

pub fn format_datetime(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Format a price in rupees with thousands separators
pub fn format_price(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("Rs. {}{}", sign, grouped)
}

/// Five-star rating bar
pub fn rating_stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("कफी र केक", 5), "कफ...");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("Great coffee", 20), "Great coffee");
        assert_eq!(excerpt("\nLoved it\nWill come back", 20), "Loved it...");
        assert_eq!(excerpt("A very long single line message", 10), "A very ...");
        assert_eq!(excerpt("", 10), "");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(format_date(Some(&dt)), "Mar 07, 2024");
        assert_eq!(format_datetime(Some(&dt)), "Mar 07, 2024 14:05");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "Rs. 0");
        assert_eq!(format_price(950.0), "Rs. 950");
        assert_eq!(format_price(12000.0), "Rs. 12,000");
        assert_eq!(format_price(1234567.4), "Rs. 1,234,567");
        assert_eq!(format_price(-500.0), "Rs. -500");
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(4), "★★★★☆");
        assert_eq!(rating_stars(0), "☆☆☆☆☆");
        assert_eq!(rating_stars(9), "★★★★★");
    }
}
