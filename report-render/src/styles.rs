/// Default CSS embedded in every rendered report, with print-friendly design tokens.
pub const REPORT_STYLES: &str = r#"
:root {
  --report-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --report-bg: #ffffff;
  --report-card-bg: #ffffff;
  --report-card-border: rgba(148, 163, 184, 0.35);
  --report-radius: 12px;
  --report-text: #1f2933;
  --report-muted: #52606d;
  --report-heading: #11181c;
  --report-surface: #f8fafc;
  --report-accent: #2563eb;
  --report-accent-bg: rgba(37, 99, 235, 0.08);
  --report-recommended: #047857;
  --report-recommended-bg: rgba(16, 185, 129, 0.14);
  --report-risk-high: #b42318;
  --report-risk-high-bg: rgba(180, 35, 24, 0.1);
  --report-risk-medium: #b54708;
  --report-risk-medium-bg: rgba(220, 104, 3, 0.12);
  --report-risk-low: #067647;
  --report-risk-low-bg: rgba(6, 118, 71, 0.12);
  --report-disclaimer-bg: rgba(255, 247, 236, 0.8);
  --report-disclaimer-border: rgba(220, 104, 3, 0.35);
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: var(--report-font-family);
  background: var(--report-bg);
  color: var(--report-text);
  line-height: 1.5;
}

.report-root {
  max-width: 880px;
  margin: 0 auto;
  padding: 32px;
  display: flex;
  flex-direction: column;
  gap: 24px;
}

.report-header {
  border-bottom: 2px solid var(--report-accent);
  padding-bottom: 16px;
}

.report-header h1 {
  margin: 0 0 6px;
  font-size: 1.6rem;
  color: var(--report-heading);
}

.report-meta {
  margin: 0;
  font-size: 0.85rem;
  color: var(--report-muted);
}

.report-section h2 {
  margin: 0 0 12px;
  font-size: 1.15rem;
  color: var(--report-heading);
}

.patient-grid {
  display: grid;
  grid-template-columns: repeat(2, minmax(0, 1fr));
  gap: 10px 24px;
  background: var(--report-surface);
  border: 1px solid var(--report-card-border);
  border-radius: var(--report-radius);
  padding: 16px 20px;
}

.patient-field {
  display: flex;
  flex-direction: column;
}

.field-label {
  font-size: 0.72rem;
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--report-muted);
}

.field-value {
  font-weight: 600;
}

.risk-summary {
  display: flex;
  align-items: center;
  gap: 16px;
}

.risk-score {
  font-size: 1.4rem;
  font-weight: 700;
  font-variant-numeric: tabular-nums;
}

.risk-badge {
  display: inline-flex;
  align-items: center;
  border-radius: 999px;
  padding: 4px 14px;
  font-weight: 600;
  font-size: 0.85rem;
}

.risk-badge.risk-high {
  color: var(--report-risk-high);
  background: var(--report-risk-high-bg);
}

.risk-badge.risk-medium {
  color: var(--report-risk-medium);
  background: var(--report-risk-medium-bg);
}

.risk-badge.risk-low {
  color: var(--report-risk-low);
  background: var(--report-risk-low-bg);
}

.treatment-list {
  display: flex;
  flex-direction: column;
  gap: 16px;
}

.treatment-card {
  border: 1px solid var(--report-card-border);
  border-radius: var(--report-radius);
  background: var(--report-card-bg);
  padding: 18px 20px;
  page-break-inside: avoid;
}

.treatment-card.recommended {
  border: 2px solid var(--report-recommended);
  background: var(--report-recommended-bg);
}

.treatment-header {
  display: flex;
  justify-content: space-between;
  align-items: baseline;
  gap: 12px;
}

.treatment-header h3 {
  margin: 0;
  font-size: 1.1rem;
}

.recommended-badge {
  display: inline-block;
  margin-left: 8px;
  border-radius: 999px;
  padding: 2px 10px;
  font-size: 0.72rem;
  font-weight: 700;
  color: #ffffff;
  background: var(--report-recommended);
  vertical-align: middle;
}

.response-probability {
  font-size: 2rem;
  font-weight: 700;
  color: var(--report-accent);
  font-variant-numeric: tabular-nums;
}

.response-caption {
  display: block;
  font-size: 0.72rem;
  color: var(--report-muted);
  text-align: right;
}

.treatment-explanation {
  margin: 12px 0 0;
  padding: 10px 14px;
  border-left: 3px solid var(--report-accent);
  background: var(--report-accent-bg);
  font-size: 0.9rem;
}

.outcomes-grid {
  display: grid;
  grid-template-columns: repeat(3, minmax(0, 1fr));
  gap: 12px;
  margin-top: 14px;
}

.outcome-cell {
  background: var(--report-surface);
  border-radius: calc(var(--report-radius) - 4px);
  padding: 10px;
  text-align: center;
}

.outcome-value {
  display: block;
  font-size: 1.15rem;
  font-weight: 700;
  font-variant-numeric: tabular-nums;
}

.outcome-label {
  font-size: 0.75rem;
  color: var(--report-muted);
}

.side-effects {
  margin-top: 14px;
}

.side-effects h4 {
  margin: 0 0 6px;
  font-size: 0.85rem;
  color: var(--report-muted);
}

.side-effect-row {
  display: flex;
  justify-content: space-between;
  padding: 4px 0;
  border-bottom: 1px dashed var(--report-card-border);
  font-size: 0.88rem;
}

.side-effect-probability {
  font-variant-numeric: tabular-nums;
  color: var(--report-muted);
}

.treatment-empty {
  color: var(--report-muted);
  font-style: italic;
}

.disclaimer {
  background: var(--report-disclaimer-bg);
  border: 1px solid var(--report-disclaimer-border);
  border-radius: var(--report-radius);
  padding: 14px 18px;
  font-size: 0.82rem;
}

.disclaimer h2 {
  font-size: 0.95rem;
}

.report-footer {
  border-top: 1px solid var(--report-card-border);
  padding-top: 12px;
  font-size: 0.75rem;
  color: var(--report-muted);
  display: flex;
  justify-content: space-between;
}

@media print {
  .report-root {
    padding: 0;
  }

  .treatment-card.recommended {
    -webkit-print-color-adjust: exact;
    print-color-adjust: exact;
  }
}
"#;
