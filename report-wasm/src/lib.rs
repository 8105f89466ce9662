//! Bridge WASM <-> JavaScript cho việc dựng và xuất báo cáo bệnh nhân.

#[cfg(target_arch = "wasm32")]
mod browser;

use report_core::{format::treatment_label, ReportConfig, ReportError};
use report_export::{parse_report_value, ParsedReport};
use report_render::render_report;
use serde::Deserialize;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsReportConfig {
    #[serde(default)]
    max_side_effects: Option<usize>,
    #[serde(default)]
    disclaimer: Option<String>,
    #[serde(default)]
    file_prefix: Option<String>,
    #[serde(default)]
    print_fallback_ms: Option<u32>,
    #[serde(default)]
    print_cleanup_ms: Option<u32>,
}

impl From<JsReportConfig> for ReportConfig {
    fn from(cfg: JsReportConfig) -> Self {
        let mut base = ReportConfig::default();
        if let Some(limit) = cfg.max_side_effects {
            base.max_side_effects = limit;
        }
        if let Some(disclaimer) = cfg.disclaimer {
            base.disclaimer = disclaimer;
        }
        if let Some(prefix) = cfg.file_prefix {
            base.file_prefix = prefix;
        }
        if let Some(ms) = cfg.print_fallback_ms {
            base.print_fallback_ms = ms;
        }
        if let Some(ms) = cfg.print_cleanup_ms {
            base.print_cleanup_ms = ms;
        }
        base
    }
}

/// Dựng báo cáo thành chuỗi HTML tự chứa.
#[wasm_bindgen]
pub fn render_report_html(report: JsValue, config: Option<JsValue>) -> Result<String, JsValue> {
    init_panic_hook();
    let report = read_report(report)?;
    let cfg = read_config(config)?;
    Ok(render_report(&report.data, &cfg))
}

/// Tên file JSON tương ứng với báo cáo.
#[wasm_bindgen]
pub fn report_file_name(report: JsValue, config: Option<JsValue>) -> Result<String, JsValue> {
    let report = read_report(report)?;
    let cfg = read_config(config)?;
    Ok(report.data.export_file_name(&cfg))
}

/// Nhãn hiển thị của mã phác đồ.
#[wasm_bindgen]
pub fn format_treatment_name(code: &str) -> String {
    treatment_label(code)
}

/// Xuất báo cáo qua hộp thoại in (`pdf`) hoặc tải file (`json`).
///
/// Không báo kết quả của hộp thoại cho phía gọi; chỉ lỗi dữ liệu hoặc lỗi
/// môi trường mới được trả về.
#[wasm_bindgen]
pub fn export_report(
    report: JsValue,
    format: &str,
    config: Option<JsValue>,
) -> Result<(), JsValue> {
    init_panic_hook();
    let report = read_report(report)?;
    let cfg = read_config(config)?;
    let format = format
        .parse()
        .map_err(|err| JsValue::from_str(&format_report_error(err)))?;
    export_with_host(&report, format, cfg)
}

#[cfg(target_arch = "wasm32")]
fn export_with_host(
    report: &ParsedReport,
    format: report_export::ExportFormat,
    cfg: ReportConfig,
) -> Result<(), JsValue> {
    let mut dispatcher = report_export::ExportDispatcher::new(
        browser::IframePrintSink::new(&cfg),
        browser::AnchorDownloadSink,
        cfg,
    );
    dispatcher.export(format, report).map_err(|err| {
        let message = format_report_error(err);
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn export_with_host(
    _: &ParsedReport,
    _: report_export::ExportFormat,
    _: ReportConfig,
) -> Result<(), JsValue> {
    Err(JsValue::from_str(
        "report-wasm chỉ hỗ trợ xuất báo cáo trên target wasm32",
    ))
}

fn read_report(report: JsValue) -> Result<ParsedReport, JsValue> {
    let value = from_value::<serde_json::Value>(report)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON báo cáo: {err}")))?;
    parse_report_value(value).map_err(|err| JsValue::from_str(&format_report_error(err)))
}

fn read_config(config: Option<JsValue>) -> Result<ReportConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsReportConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(ReportConfig::from(cfg))
        }
        _ => Ok(ReportConfig::default()),
    }
}

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_report_error(err: ReportError) -> String {
    format!("Report error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_js_config_keeps_defaults() {
        let cfg = ReportConfig::from(JsReportConfig {
            max_side_effects: Some(4),
            ..JsReportConfig::default()
        });
        assert_eq!(cfg.max_side_effects, 4);
        assert_eq!(cfg.file_prefix, "patient_report");
        assert_eq!(cfg.print_cleanup_ms, 1000);
    }

    #[test]
    fn empty_js_config_is_default() {
        assert_eq!(
            ReportConfig::from(JsReportConfig::default()),
            ReportConfig::default()
        );
    }

    #[test]
    fn treatment_names_are_exposed() {
        assert_eq!(format_treatment_name("radiation"), "Radiation Therapy");
        assert_eq!(format_treatment_name("vaccine"), "Vaccine");
    }

    #[test]
    fn errors_are_prefixed() {
        assert_eq!(
            format_report_error(ReportError::MissingField("patient_info.name")),
            "Report error: Thiếu trường bắt buộc: patient_info.name"
        );
    }
}
