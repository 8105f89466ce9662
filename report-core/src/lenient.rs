//! Đọc các trường tùy chọn một cách dễ dãi: giá trị sai kiểu trở thành `None`
//! thay vì làm hỏng cả báo cáo.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Số thực từ số JSON hoặc chuỗi số (`"62.4"`); giá trị khác bị bỏ qua.
pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// Số nguyên không âm, chấp nhận cả `54`, `54.0` và `"54"`.
pub(crate) fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_of)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

/// Chuỗi tùy chọn; số và boolean được đổi sang dạng chữ.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_of))
}

/// Chuỗi không bắt buộc có mặt; thiếu hoặc sai kiểu cho chuỗi rỗng.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_string(deserializer).map(Option::unwrap_or_default)
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::opt_u32")]
        age: Option<u32>,
        #[serde(default, deserialize_with = "super::opt_f64")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "super::opt_string")]
        stage: Option<String>,
    }

    fn read(raw: &str) -> Probe {
        serde_json::from_str(raw).expect("Giá trị lỗi kiểu phải được bỏ qua")
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let parsed = read(r#"{"age":"54","score":" 62.4 ","stage":3}"#);
        assert_eq!(parsed.age, Some(54));
        assert_eq!(parsed.score, Some(62.4));
        assert_eq!(parsed.stage.as_deref(), Some("3"));
    }

    #[test]
    fn wrong_types_become_none() {
        let parsed = read(r#"{"age":"fifty","score":{"value":1},"stage":["IV"]}"#);
        assert_eq!(parsed.age, None);
        assert_eq!(parsed.score, None);
        assert_eq!(parsed.stage, None);
    }

    #[test]
    fn age_rejects_fractions_and_negatives() {
        assert_eq!(read(r#"{"age":54.0}"#).age, Some(54));
        assert_eq!(read(r#"{"age":54.5}"#).age, None);
        assert_eq!(read(r#"{"age":-3}"#).age, None);
    }

    #[test]
    fn null_and_missing_are_none() {
        let parsed = read(r#"{"age":null,"score":"NaN"}"#);
        assert_eq!(parsed.age, None);
        assert_eq!(parsed.score, None);
        assert_eq!(parsed.stage, None);
    }
}
