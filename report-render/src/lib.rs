//! Dựng tài liệu HTML tự chứa cho báo cáo bệnh nhân, sẵn sàng để in.

mod styles;

use std::fmt::Write as _;

use report_core::format::{
    format_date, format_percent, format_score, format_time, or_na, treatment_label,
};
use report_core::{PatientReportData, ReportConfig, RiskAssessment, SideEffect, TreatmentEntry};

pub use styles::REPORT_STYLES;

const RISK_CLASSES: [&str; 3] = ["low", "medium", "high"];

/// Dựng toàn bộ báo cáo thành một chuỗi HTML.
///
/// Hàm thuần, không giữ trạng thái giữa các lần gọi. Thứ tự phác đồ được giữ
/// nguyên: phác đồ đầu tiên luôn mang dấu "Recommended".
pub fn render_report(data: &PatientReportData, config: &ReportConfig) -> String {
    let patient = &data.patient_info;
    let mut out = String::with_capacity(16 * 1024);

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(
        out,
        "<title>Patient Report - {}</title>",
        escape_html(&patient.name)
    );
    let _ = writeln!(out, "<style>{REPORT_STYLES}</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<main class=\"report-root\">");

    render_header(&mut out, data);
    render_patient_info(&mut out, data);
    render_risk(&mut out, &data.risk_assessment);
    render_treatments(&mut out, &data.recommendations.treatments, config);
    render_disclaimer(&mut out, data, config);
    render_footer(&mut out, data);

    let _ = writeln!(out, "</main>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");

    tracing::debug!(
        patient = %patient.name,
        treatments = data.recommendations.treatments.len(),
        bytes = out.len(),
        "Đã dựng báo cáo bệnh nhân"
    );
    out
}

fn render_header(out: &mut String, data: &PatientReportData) {
    let author = data
        .generated_by
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .or(data.doctor_email.as_deref());

    let _ = writeln!(out, "<header class=\"report-header\">");
    let _ = writeln!(out, "<h1>Patient Treatment Recommendation Report</h1>");
    let _ = writeln!(
        out,
        "<p class=\"report-meta\">Generated: {} &middot; By: {}</p>",
        escape_html(&format_time(data.generated_at.as_deref())),
        escape_html(&or_na(author))
    );
    let _ = writeln!(out, "</header>");
}

fn render_patient_info(out: &mut String, data: &PatientReportData) {
    let patient = &data.patient_info;
    let age = patient
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| or_na(None));

    let fields: [(&str, String); 9] = [
        ("Name", patient.name.clone()),
        ("Age", age),
        ("Gender", or_na(patient.gender.as_deref())),
        ("Cancer Type", or_na(patient.cancer_type.as_deref())),
        ("Subtype", or_na(patient.cancer_subtype.as_deref())),
        ("Stage", or_na(patient.stage.as_deref())),
        ("Diagnosis Date", format_date(patient.diagnosis_date.as_deref())),
        ("Email", or_na(patient.email.as_deref())),
        ("Phone", or_na(patient.phone.as_deref())),
    ];

    let _ = writeln!(out, "<section class=\"report-section\">");
    let _ = writeln!(out, "<h2>Patient Information</h2>");
    let _ = writeln!(out, "<div class=\"patient-grid\">");
    for (label, value) in &fields {
        let _ = writeln!(
            out,
            "<div class=\"patient-field\"><span class=\"field-label\">{label}</span><span class=\"field-value\">{}</span></div>",
            escape_html(value)
        );
    }
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</section>");
}

fn render_risk(out: &mut String, risk: &RiskAssessment) {
    let level_text = risk
        .level
        .as_deref()
        .filter(|level| !level.trim().is_empty())
        .unwrap_or("Unknown");

    let _ = writeln!(out, "<section class=\"report-section\">");
    let _ = writeln!(out, "<h2>Risk Assessment</h2>");
    let _ = writeln!(out, "<div class=\"risk-summary\">");
    let _ = writeln!(
        out,
        "<span class=\"risk-score\">{}</span>",
        format_score(risk.score)
    );
    let _ = writeln!(
        out,
        "<span class=\"risk-badge risk-{}\">{}</span>",
        risk_class(risk.level.as_deref()),
        escape_html(level_text)
    );
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</section>");
}

/// Lớp hiển thị cho mức nguy cơ; mức lạ hoặc thiếu dùng `medium`.
pub fn risk_class(level: Option<&str>) -> &'static str {
    let normalized = level.map(|value| value.trim().to_lowercase());
    RISK_CLASSES
        .iter()
        .copied()
        .find(|class| normalized.as_deref() == Some(*class))
        .unwrap_or("medium")
}

fn render_treatments(out: &mut String, treatments: &[TreatmentEntry], config: &ReportConfig) {
    let _ = writeln!(out, "<section class=\"report-section\">");
    let _ = writeln!(out, "<h2>Treatment Recommendations</h2>");
    let _ = writeln!(out, "<div class=\"treatment-list\">");
    if treatments.is_empty() {
        let _ = writeln!(
            out,
            "<p class=\"treatment-empty\">No treatment recommendations are available for this patient.</p>"
        );
    }
    for (index, treatment) in treatments.iter().enumerate() {
        render_treatment_card(out, treatment, index == 0, config);
    }
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</section>");
}

fn render_treatment_card(
    out: &mut String,
    treatment: &TreatmentEntry,
    recommended: bool,
    config: &ReportConfig,
) {
    let card_class = if recommended {
        "treatment-card recommended"
    } else {
        "treatment-card"
    };
    let badge = if recommended {
        "<span class=\"recommended-badge\">Recommended</span>"
    } else {
        ""
    };

    let _ = writeln!(out, "<article class=\"{card_class}\">");
    let _ = writeln!(out, "<div class=\"treatment-header\">");
    let _ = writeln!(
        out,
        "<h3 class=\"treatment-name\">{}{badge}</h3>",
        escape_html(&treatment_label(&treatment.treatment))
    );
    let _ = writeln!(
        out,
        "<div><span class=\"response-probability\">{}</span><span class=\"response-caption\">Response probability</span></div>",
        format_percent(treatment.response_probability, 1)
    );
    let _ = writeln!(out, "</div>");

    if let Some(explanation) = treatment
        .llm_explanation
        .as_deref()
        .filter(|text| !text.trim().is_empty())
    {
        let _ = writeln!(
            out,
            "<p class=\"treatment-explanation\">{}</p>",
            escape_html(explanation)
        );
    }

    let outcomes = &treatment.outcomes;
    let _ = writeln!(out, "<div class=\"outcomes-grid\">");
    for (label, value) in [
        ("1-Year Survival", outcomes.survival_1yr),
        ("Response Rate", outcomes.response_rate),
        ("Remission Probability", outcomes.remission_probability),
    ] {
        let _ = writeln!(
            out,
            "<div class=\"outcome-cell\"><span class=\"outcome-value\">{}</span><span class=\"outcome-label\">{label}</span></div>",
            format_percent(value, 1)
        );
    }
    let _ = writeln!(out, "</div>");

    render_side_effects(
        out,
        &treatment.side_effects.common_side_effects,
        config.max_side_effects,
    );
    let _ = writeln!(out, "</article>");
}

fn render_side_effects(out: &mut String, side_effects: &[SideEffect], limit: usize) {
    if side_effects.is_empty() || limit == 0 {
        return;
    }
    let _ = writeln!(out, "<div class=\"side-effects\">");
    let _ = writeln!(out, "<h4>Common Side Effects</h4>");
    for effect in side_effects.iter().take(limit) {
        let _ = writeln!(
            out,
            "<div class=\"side-effect-row\"><span class=\"side-effect-name\">{}</span><span class=\"side-effect-probability\">{}</span></div>",
            escape_html(&effect.name),
            format_percent(effect.probability, 0)
        );
    }
    let _ = writeln!(out, "</div>");
}

fn render_disclaimer(out: &mut String, data: &PatientReportData, config: &ReportConfig) {
    let text = data
        .recommendations
        .note
        .as_deref()
        .filter(|note| !note.trim().is_empty())
        .unwrap_or(config.disclaimer.as_str());

    let _ = writeln!(out, "<section class=\"report-section disclaimer\">");
    let _ = writeln!(out, "<h2>Important Notice</h2>");
    let _ = writeln!(out, "<p>{}</p>", escape_html(text));
    let _ = writeln!(out, "</section>");
}

fn render_footer(out: &mut String, data: &PatientReportData) {
    let _ = writeln!(out, "<footer class=\"report-footer\">");
    let _ = writeln!(
        out,
        "<span class=\"report-id\">Report ID: {}</span>",
        escape_html(&data.report_id())
    );
    let _ = writeln!(out, "<span>Confidential medical document</span>");
    let _ = writeln!(out, "</footer>");
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
