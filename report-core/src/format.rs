//! Định dạng nhãn phác đồ, ngày giờ và tỉ lệ phần trăm cho báo cáo.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Giá trị hiển thị khi trường tùy chọn bị thiếu.
pub const NOT_AVAILABLE: &str = "N/A";

const TREATMENT_LABELS: [(&str, &str); 6] = [
    ("chemo", "Chemotherapy"),
    ("targeted", "Targeted Therapy"),
    ("immuno", "Immunotherapy"),
    ("radiation", "Radiation Therapy"),
    ("surgery", "Surgery"),
    ("combination", "Combination Therapy"),
];

/// Chuyển mã phác đồ thành nhãn hiển thị. Mã lạ được viết hoa ký tự đầu.
pub fn treatment_label(code: &str) -> String {
    TREATMENT_LABELS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| capitalize_first(code))
}

/// Ngày dạng dài, ví dụ `January 5, 2025`.
///
/// Đầu vào rỗng trả về `N/A`; không đọc được thì trả lại nguyên chuỗi gốc.
pub fn format_date(input: Option<&str>) -> String {
    format_with(input, "%B %-d, %Y")
}

/// Ngày dạng dài kèm giờ phút, ví dụ `January 5, 2025 at 10:00 AM`.
pub fn format_time(input: Option<&str>) -> String {
    format_with(input, "%B %-d, %Y at %I:%M %p")
}

fn format_with(input: Option<&str>, pattern: &str) -> String {
    let Some(raw) = input.filter(|value| !value.trim().is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_timestamp(raw) {
        Some(dt) => dt.format(pattern).to_string(),
        None => raw.to_string(),
    }
}

/// Đọc mốc thời gian theo RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` hoặc `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Nhân tỉ lệ với 100 và làm tròn cố định `decimals` chữ số.
pub fn format_percent(fraction: Option<f64>, decimals: usize) -> String {
    match fraction.filter(|value| value.is_finite()) {
        Some(value) => format!("{:.*}%", decimals, value * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Điểm nguy cơ với một chữ số thập phân.
pub fn format_score(score: Option<f64>) -> String {
    match score.filter(|value| value.is_finite()) {
        Some(value) => format!("{value:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Trả về `N/A` khi chuỗi thiếu hoặc chỉ có khoảng trắng.
pub fn or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Thay mỗi cụm khoảng trắng bằng một dấu `_`.
pub fn underscore_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join("_")
}

fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
