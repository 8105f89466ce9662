//! Mô hình dữ liệu báo cáo bệnh nhân và các tiện ích định dạng dùng chung.

pub mod format;
mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lời miễn trừ mặc định khi dữ liệu không kèm ghi chú riêng.
pub const DEFAULT_DISCLAIMER: &str = "This report is generated by an AI-assisted decision \
support system and is intended for use by qualified healthcare professionals only. \
The predictions and recommendations are based on statistical models and do not replace \
clinical judgment. All treatment decisions should be made in consultation with the \
patient's care team, taking into account the full clinical context.";

/// Cấu hình điều chỉnh cách dựng và xuất báo cáo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Số tác dụng phụ tối đa hiển thị cho mỗi phác đồ.
    pub max_side_effects: usize,
    /// Lời miễn trừ dùng khi `recommendations.note` trống.
    pub disclaimer: String,
    /// Tiền tố tên file khi xuất JSON.
    pub file_prefix: String,
    /// Thời gian chờ (ms) trước khi in dù khung in chưa báo đã tải xong.
    pub print_fallback_ms: u32,
    /// Thời gian (ms) giữ khung in sau khi gọi lệnh in.
    pub print_cleanup_ms: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_side_effects: 6,
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            file_prefix: "patient_report".to_string(),
            print_fallback_ms: 1000,
            print_cleanup_ms: 1000,
        }
    }
}

/// Toàn bộ dữ liệu của một báo cáo bệnh nhân, do lớp API cung cấp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientReportData {
    pub patient_info: PatientInfo,
    /// Dữ liệu lâm sàng thô, chỉ chuyển tiếp nguyên vẹn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_data: Option<Value>,
    #[serde(default)]
    pub risk_assessment: RiskAssessment,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_by: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub doctor_email: Option<String>,
    /// Các khóa không nhận diện được, giữ nguyên khi serialize lại.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Thông tin hành chính và chẩn đoán của bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PatientInfo {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cancer_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cancer_subtype: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub stage: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnosis_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Điểm nguy cơ và nhãn phân tầng tương ứng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RiskAssessment {
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
}

/// Danh sách phác đồ đã xếp hạng từ phía máy chủ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Recommendations {
    /// Thứ tự giữ nguyên, phần tử đầu là khuyến nghị hàng đầu.
    #[serde(default)]
    pub treatments: Vec<TreatmentEntry>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

/// Một phác đồ ứng viên cùng xác suất đáp ứng và kết cục.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TreatmentEntry {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub treatment: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_probability: Option<f64>,
    #[serde(default)]
    pub outcomes: Outcomes,
    #[serde(default)]
    pub side_effects: SideEffects,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub llm_explanation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Các kết cục dự đoán, đều là tỉ lệ trong khoảng [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Outcomes {
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub survival_1yr: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_rate: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub remission_probability: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SideEffects {
    #[serde(default)]
    pub common_side_effects: Vec<SideEffect>,
}

/// Tác dụng phụ thường gặp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SideEffect {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub probability: Option<f64>,
}

impl PatientReportData {
    /// Khởi tạo báo cáo tối thiểu chỉ với tên bệnh nhân (dùng cho mock/testing).
    pub fn for_patient(name: impl Into<String>) -> Self {
        Self {
            patient_info: PatientInfo {
                name: name.into(),
                ..PatientInfo::default()
            },
            clinical_data: None,
            risk_assessment: RiskAssessment::default(),
            recommendations: Recommendations::default(),
            generated_at: None,
            generated_by: None,
            doctor_email: None,
            extra: Map::new(),
        }
    }

    /// Phác đồ được khuyến nghị (phần tử đầu danh sách).
    pub fn top_treatment(&self) -> Option<&TreatmentEntry> {
        self.recommendations.treatments.first()
    }

    /// Kiểm tra các trường bắt buộc trước khi xuất.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.patient_info.name.trim().is_empty() {
            return Err(ReportError::MissingField("patient_info.name"));
        }
        Ok(())
    }

    /// Mã định danh báo cáo: tên bệnh nhân (khoảng trắng thành `_`) nối với
    /// mốc thời gian tạo tính bằng mili giây.
    ///
    /// Không bảo đảm duy nhất toàn cục: hai báo cáo cùng bệnh nhân trong cùng
    /// một mili giây sẽ trùng mã.
    pub fn report_id(&self) -> String {
        let stamp = self
            .generated_at
            .as_deref()
            .and_then(format::parse_timestamp)
            .map(|dt| dt.timestamp_millis().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!("{}_{stamp}", format::underscore_whitespace(&self.patient_info.name))
    }

    /// Tên file khi xuất JSON, chỉ phụ thuộc vào dữ liệu đầu vào.
    pub fn export_file_name(&self, config: &ReportConfig) -> String {
        let date = self
            .generated_at
            .as_deref()
            .and_then(format::parse_timestamp)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "undated".to_string());
        format!(
            "{}_{}_{date}.json",
            config.file_prefix,
            format::underscore_whitespace(&self.patient_info.name)
        )
    }
}

/// Lỗi chung khi dựng hoặc xuất báo cáo.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Thiếu trường bắt buộc: {0}")]
    MissingField(&'static str),
    #[error("Không đọc được dữ liệu báo cáo: {0}")]
    Parse(String),
    #[error("Không serialize được báo cáo: {0}")]
    Serialize(String),
    #[error("Môi trường xuất báo cáo lỗi: {0}")]
    Host(String),
    #[error("Tên file không hợp lệ: {0}")]
    InvalidFileName(String),
}
