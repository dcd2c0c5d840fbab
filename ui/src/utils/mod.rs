// Formatting and validation helpers
use chrono::{DateTime, NaiveDate, Utc};

/// Vietnamese đồng with dot-separated thousands: `1500000` → `"1.500.000 ₫"`.
pub fn format_vnd(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if negative {
        format!("-{} ₫", out)
    } else {
        format!("{} ₫", out)
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);
    if duration.num_seconds() < 60 {
        "vừa xong".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} phút trước", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} giờ trước", duration.num_hours())
    } else if duration.num_days() < 30 {
        format!("{} ngày trước", duration.num_days())
    } else {
        dt.format("%d/%m/%Y").to_string()
    }
}

pub fn validate_email(email: &str) -> bool {
    email.len() > 3
        && email.len() < 255
        && email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
}

/// Vietnamese mobile numbers: 10 digits starting with 0, or +84 plus 9.
pub fn validate_phone(phone: &str) -> bool {
    let normalized = phone.strip_prefix("+84").map(|rest| format!("0{}", rest));
    let phone = normalized.as_deref().unwrap_or(phone);
    phone.len() == 10 && phone.starts_with('0') && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_password(password: &str, min_length: usize) -> bool {
    password.len() >= min_length
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(0), "0 ₫");
        assert_eq!(format_vnd(500), "500 ₫");
        assert_eq!(format_vnd(1_500), "1.500 ₫");
        assert_eq!(format_vnd(1_500_000), "1.500.000 ₫");
        assert_eq!(format_vnd(25_000_000), "25.000.000 ₫");
        assert_eq!(format_vnd(-750_000), "-750.000 ₫");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("tenant@example.com"));
        assert!(!validate_email(""));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("tenant@"));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912345678"));
        assert!(validate_phone("+84912345678"));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("091234567a"));
        assert!(!validate_phone("9123456780"));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("ngắn", 10), "ngắn");
        assert_eq!(truncate_string("một chuỗi khá dài", 10), "một chu...");
    }
}
