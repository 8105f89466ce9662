mod sink;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use report_core::ReportConfig;
use report_export::{parse_report_str, ExportDispatcher, ExportFormat, ParsedReport};
use report_render::render_report;
use tracing_subscriber::EnvFilter;

use crate::sink::{DirectoryDownloadSink, HtmlFilePrintSink};

#[derive(Parser, Debug)]
#[command(
    name = "report-cli",
    about = "Dựng và xuất báo cáo điều trị bệnh nhân từ file JSON."
)]
struct Args {
    /// File JSON cấu hình (các khóa đều tùy chọn).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dựng báo cáo HTML và ghi ra file hoặc stdout.
    Render {
        /// Đường dẫn tới file JSON báo cáo.
        #[arg(short, long)]
        input: PathBuf,
        /// File HTML đầu ra; bỏ trống để in ra stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Xuất báo cáo vào một thư mục.
    Export {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Render { input, output } => {
            let report = load_report(&input)?;
            let html = render_report(&report.data, &config);
            match output {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("Không ghi được file {path:?}"))?;
                    tracing::info!(path = %path.display(), "Đã ghi báo cáo HTML");
                }
                None => println!("{html}"),
            }
        }
        Command::Export {
            input,
            format,
            out_dir,
        } => {
            let report = load_report(&input)?;
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Không tạo được thư mục {out_dir:?}"))?;

            let mut dispatcher = ExportDispatcher::new(
                HtmlFilePrintSink::new(&out_dir, report.data.report_id()),
                DirectoryDownloadSink::new(&out_dir),
                config,
            );
            dispatcher
                .export(format.into(), &report)
                .with_context(|| format!("Xuất báo cáo {:?} thất bại", input))?;

            println!(
                "Patient: {}\nTreatments: {}\nWritten to: {}",
                report.data.patient_info.name,
                report.data.recommendations.treatments.len(),
                out_dir.display()
            );
        }
    }

    Ok(())
}

fn load_report(path: &Path) -> anyhow::Result<ParsedReport> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file {path:?}"))?;
    let report = parse_report_str(&data)?;
    Ok(report)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("Cấu hình không hợp lệ: {path:?}"))
}
