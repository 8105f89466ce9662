//! Điều phối xuất báo cáo: bản in HTML và file JSON có cấu trúc.
//!
//! Các tác dụng phụ phía host (khung in, tải file) nằm sau hai capability
//! [`PrintSink`] và [`FileDownloadSink`], nhờ vậy bộ điều phối chạy được trên
//! trình duyệt, trên một thư mục đĩa, hoặc với sink ghi nhận trong test.

pub mod recording;
mod scoped;

use std::fmt;
use std::str::FromStr;

use report_core::{PatientReportData, ReportConfig, ReportError};
use report_render::render_report;
use serde_json::Value;

pub use scoped::{Scoped, TransientResource};

/// MIME của file xuất JSON.
pub const JSON_MIME: &str = "application/json";

/// Đánh dấu chung cho mọi đích giao tài liệu của host.
pub trait DocumentSink {}

/// Khung hiển thị tạm để mở hộp thoại in cho tài liệu đã dựng.
pub trait PrintSink: DocumentSink {
    type Surface: TransientResource;

    /// Mở khung chứa `document`.
    ///
    /// Trả về `Ok(None)` khi host từ chối (popup bị chặn...).
    fn open_surface(&mut self, document: &str) -> Result<Option<Self::Surface>, ReportError>;

    /// Gọi lệnh in khi khung báo đã tải xong, sau đó giải phóng khung.
    ///
    /// Sink giữ guard từ đây; drop guard ở bất kỳ đâu đều giải phóng khung.
    fn print_when_loaded(&mut self, surface: Scoped<Self::Surface>) -> Result<(), ReportError>;
}

/// Đưa một file có tên cho người dùng tải về.
pub trait FileDownloadSink: DocumentSink {
    type Link: TransientResource;

    fn stage(&mut self, file: &DownloadFile) -> Result<Self::Link, ReportError>;

    /// Cú click giả lập giao file cho người dùng.
    fn click(&mut self, link: &mut Self::Link) -> Result<(), ReportError>;
}

/// File sẵn sàng để tải về.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: Vec<u8>,
}

/// Định dạng xuất mà phía gọi yêu cầu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Tài liệu để in; người dùng lưu thành PDF từ hộp thoại in.
    Pdf,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" | "print" | "html" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            other => Err(ReportError::Parse(format!(
                "Định dạng xuất không được hỗ trợ: {other}"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Báo cáo đã đọc: bản ghi JSON gốc cùng góc nhìn có kiểu để dựng HTML.
///
/// Xuất JSON luôn dùng `raw`, nên khóa lạ, giá trị `null` và cách viết số
/// của phía gọi được giữ nguyên.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub raw: Value,
    pub data: PatientReportData,
}

impl ParsedReport {
    /// Đọc báo cáo từ một `serde_json::Value`, kiểm tra trường bắt buộc.
    pub fn from_value(raw: Value) -> Result<Self, ReportError> {
        let data: PatientReportData = serde_json::from_value(raw.clone())
            .map_err(|err| ReportError::Parse(err.to_string()))?;
        data.validate()?;
        Ok(Self { raw, data })
    }

    /// Báo cáo dựng trong code, không có bản ghi gốc.
    pub fn from_data(data: PatientReportData) -> Result<Self, ReportError> {
        data.validate()?;
        let raw =
            serde_json::to_value(&data).map_err(|err| ReportError::Serialize(err.to_string()))?;
        Ok(Self { raw, data })
    }
}

/// Đọc báo cáo từ chuỗi JSON.
pub fn parse_report_str(report_json: &str) -> Result<ParsedReport, ReportError> {
    let raw: Value =
        serde_json::from_str(report_json).map_err(|err| ReportError::Parse(err.to_string()))?;
    ParsedReport::from_value(raw)
}

/// Đọc báo cáo từ `serde_json::Value`.
pub fn parse_report_value(report: Value) -> Result<ParsedReport, ReportError> {
    ParsedReport::from_value(report)
}

/// Nội dung JSON xuất ra: bản ghi gốc, định dạng đẹp, không biến đổi.
pub fn to_pretty_json(raw: &Value) -> Result<String, ReportError> {
    serde_json::to_string_pretty(raw).map_err(|err| ReportError::Serialize(err.to_string()))
}

/// Tạo file JSON để tải về cho `report`.
pub fn structured_file(
    report: &ParsedReport,
    config: &ReportConfig,
) -> Result<DownloadFile, ReportError> {
    Ok(DownloadFile {
        file_name: report.data.export_file_name(config),
        mime: JSON_MIME,
        contents: to_pretty_json(&report.raw)?.into_bytes(),
    })
}

/// Chuyển báo cáo tới sink in hoặc sink tải file.
pub struct ExportDispatcher<P, F> {
    print: P,
    download: F,
    config: ReportConfig,
}

impl<P, F> ExportDispatcher<P, F>
where
    P: PrintSink,
    F: FileDownloadSink,
{
    pub fn new(print: P, download: F, config: ReportConfig) -> Self {
        Self {
            print,
            download,
            config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Trả lại các sink, ví dụ để test xem sink ghi nhận được gì.
    pub fn into_sinks(self) -> (P, F) {
        (self.print, self.download)
    }

    pub fn export(
        &mut self,
        format: ExportFormat,
        report: &ParsedReport,
    ) -> Result<(), ReportError> {
        match format {
            ExportFormat::Pdf => self.export_printable(&report.data),
            ExportFormat::Json => self.export_structured(report),
        }
    }

    /// Dựng báo cáo rồi gửi sang khung in.
    ///
    /// Khung bị từ chối chỉ được ghi log, không báo lỗi.
    pub fn export_printable(&mut self, data: &PatientReportData) -> Result<(), ReportError> {
        let document = render_report(data, &self.config);
        let Some(surface) = self.print.open_surface(&document)? else {
            tracing::warn!(
                report_id = %data.report_id(),
                "Host từ chối mở khung in, không in gì"
            );
            return Ok(());
        };

        self.print.print_when_loaded(Scoped::new(surface))?;
        tracing::info!(report_id = %data.report_id(), "Đã gửi báo cáo tới khung in");
        Ok(())
    }

    /// Cho tải bản ghi gốc dưới dạng JSON định dạng đẹp.
    ///
    /// Link tạm được giải phóng ngay khi cú click trả về.
    pub fn export_structured(&mut self, report: &ParsedReport) -> Result<(), ReportError> {
        let file = structured_file(report, &self.config)?;
        let mut link = Scoped::new(self.download.stage(&file)?);
        self.download.click(&mut link)?;
        drop(link);

        tracing::info!(
            file_name = %file.file_name,
            bytes = file.contents.len(),
            "Đã xuất báo cáo JSON"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RecordingDownloadSink, RecordingPrintSink};
    use report_core::TreatmentEntry;

    fn sample() -> ParsedReport {
        let mut data = PatientReportData::for_patient("Jane Doe");
        data.generated_at = Some("2025-01-05T10:00:00Z".to_string());
        data.recommendations.treatments.push(TreatmentEntry {
            treatment: "immuno".to_string(),
            response_probability: Some(0.78),
            ..TreatmentEntry::default()
        });
        ParsedReport::from_data(data).expect("Báo cáo mẫu không hợp lệ")
    }

    fn dispatcher() -> ExportDispatcher<RecordingPrintSink, RecordingDownloadSink> {
        ExportDispatcher::new(
            RecordingPrintSink::default(),
            RecordingDownloadSink::default(),
            ReportConfig::default(),
        )
    }

    fn exported_value(download: &RecordingDownloadSink) -> Value {
        serde_json::from_slice(&download.downloads[0].contents).expect("JSON xuất ra không hợp lệ")
    }

    #[test]
    fn export_format_parses_aliases() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.to_string(), "json");
    }

    #[test]
    fn printable_export_prints_rendered_document() {
        let mut dispatcher = dispatcher();
        dispatcher.export_printable(&sample().data).unwrap();

        let (print, download) = dispatcher.into_sinks();
        assert_eq!(print.printed.len(), 1);
        assert!(print.printed[0].contains("Immunotherapy"));
        assert!(print.printed[0].contains("78.0%"));
        assert_eq!(print.released(), 1);
        assert!(download.downloads.is_empty());
    }

    #[test]
    fn refused_surface_is_a_silent_no_op() {
        let mut dispatcher = ExportDispatcher::new(
            RecordingPrintSink::refusing(),
            RecordingDownloadSink::default(),
            ReportConfig::default(),
        );
        assert!(dispatcher.export(ExportFormat::Pdf, &sample()).is_ok());
        let (print, _) = dispatcher.into_sinks();
        assert!(print.printed.is_empty());
        assert_eq!(print.released(), 0);
    }

    #[test]
    fn structured_export_releases_link_after_click() {
        let mut dispatcher = dispatcher();
        dispatcher.export(ExportFormat::Json, &sample()).unwrap();

        let (print, download) = dispatcher.into_sinks();
        assert!(print.printed.is_empty());
        assert_eq!(download.downloads.len(), 1);
        assert_eq!(
            download.downloads[0].file_name,
            "patient_report_Jane_Doe_2025-01-05.json"
        );
        assert_eq!(download.downloads[0].mime, JSON_MIME);
        assert_eq!(download.released(), 1);
    }

    #[test]
    fn failed_click_still_releases_link() {
        let mut dispatcher = ExportDispatcher::new(
            RecordingPrintSink::default(),
            RecordingDownloadSink::failing_clicks(),
            ReportConfig::default(),
        );
        let err = dispatcher.export_structured(&sample()).unwrap_err();
        assert!(matches!(err, ReportError::Host(_)));

        let (_, download) = dispatcher.into_sinks();
        assert!(download.downloads.is_empty());
        assert_eq!(download.released(), 1);
    }

    #[test]
    fn structured_export_keeps_nulls_integers_and_absent_blocks() {
        let raw = r#"{
            "patient_info": {"name": "A", "email": null},
            "risk_assessment": {"score": 62, "level": "High", "confidence": 0.9},
            "clinical_data": null
        }"#;
        let original: Value = serde_json::from_str(raw).unwrap();
        let report = parse_report_str(raw).unwrap();

        let mut dispatcher = dispatcher();
        dispatcher.export_structured(&report).unwrap();
        let (_, download) = dispatcher.into_sinks();

        let exported = exported_value(&download);
        assert_eq!(exported, original);
        assert!(exported["risk_assessment"]["score"].is_u64());
        assert!(exported["patient_info"]["email"].is_null());
        assert!(exported.get("recommendations").is_none());
        let text = String::from_utf8_lossy(&download.downloads[0].contents);
        assert!(text.contains("\"score\": 62"));
        assert!(!text.contains("62.0"));

        let position = |key: &str| text.find(key).expect("Thiếu khóa");
        assert!(position("patient_info") < position("risk_assessment"));
        assert!(position("risk_assessment") < position("clinical_data"));
    }

    #[test]
    fn malformed_optional_fields_still_export() {
        let raw = r#"{
            "patient_info": {"name": "A", "age": "unknown"},
            "risk_assessment": {"score": "62.4"}
        }"#;
        let report = parse_report_str(raw).expect("Trường tùy chọn sai kiểu không được chặn xuất");
        assert_eq!(report.data.patient_info.age, None);
        assert_eq!(report.data.risk_assessment.score, Some(62.4));

        let mut dispatcher = dispatcher();
        dispatcher.export(ExportFormat::Pdf, &report).unwrap();
        dispatcher.export(ExportFormat::Json, &report).unwrap();
        let (print, download) = dispatcher.into_sinks();

        assert!(print.printed[0].contains(
            "<span class=\"field-label\">Age</span><span class=\"field-value\">N/A</span>"
        ));
        assert!(print.printed[0].contains("<span class=\"risk-score\">62.4</span>"));
        assert_eq!(exported_value(&download)["patient_info"]["age"], "unknown");
    }

    #[test]
    fn parse_rejects_blank_name() {
        let err = parse_report_str(r#"{"patient_info":{"name":" "}}"#).unwrap_err();
        assert!(matches!(err, ReportError::MissingField("patient_info.name")));
    }

    #[test]
    fn parse_reports_malformed_json() {
        let err = parse_report_str("{not json").unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[test]
    fn unsupported_format_message_names_the_format() {
        let err = "csv".parse::<ExportFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Không đọc được dữ liệu báo cáo: Định dạng xuất không được hỗ trợ: csv"
        );
    }
}
