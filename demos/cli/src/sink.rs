//! Sink ghi báo cáo vào thư mục: ghi ra file tạm rồi đổi tên khi hoàn tất.

use std::fs;
use std::path::{Path, PathBuf};

use report_core::ReportError;
use report_export::{
    DocumentSink, DownloadFile, FileDownloadSink, PrintSink, Scoped, TransientResource,
};

/// File tạm `.part`; bị xóa khi giải phóng nếu chưa được đổi tên.
pub struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    fn write(dir: &Path, file_name: &str, contents: &[u8]) -> Result<Self, ReportError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(ReportError::InvalidFileName(file_name.to_string()));
        }
        let staged = Self {
            staging: dir.join(format!(".{file_name}.part")),
            target: dir.join(file_name),
        };
        fs::write(&staged.staging, contents)
            .map_err(|err| ReportError::Host(format!("{}: {err}", staged.staging.display())))?;
        Ok(staged)
    }

    fn commit(&self) -> Result<(), ReportError> {
        fs::rename(&self.staging, &self.target)
            .map_err(|err| ReportError::Host(format!("{}: {err}", self.target.display())))
    }
}

impl TransientResource for StagedFile {
    fn release(&mut self) {
        if self.staging.exists() {
            if let Err(err) = fs::remove_file(&self.staging) {
                tracing::warn!(path = %self.staging.display(), "Không xóa được file tạm: {err}");
            }
        }
    }
}

/// "In" bằng cách ghi tài liệu HTML thành `<report_id>.html` để mở và in từ trình duyệt.
pub struct HtmlFilePrintSink {
    dir: PathBuf,
    report_id: String,
}

impl HtmlFilePrintSink {
    pub fn new(dir: &Path, report_id: String) -> Self {
        Self {
            dir: dir.to_path_buf(),
            report_id,
        }
    }
}

impl DocumentSink for HtmlFilePrintSink {}

impl PrintSink for HtmlFilePrintSink {
    type Surface = StagedFile;

    fn open_surface(&mut self, document: &str) -> Result<Option<StagedFile>, ReportError> {
        let file_name = format!("{}.html", self.report_id);
        StagedFile::write(&self.dir, &file_name, document.as_bytes()).map(Some)
    }

    fn print_when_loaded(&mut self, surface: Scoped<StagedFile>) -> Result<(), ReportError> {
        surface.commit()?;
        tracing::info!(
            path = %surface.target.display(),
            "Đã ghi bản in, mở bằng trình duyệt để in"
        );
        Ok(())
    }
}

/// Lưu file tải xuống vào thư mục đích.
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl DocumentSink for DirectoryDownloadSink {}

impl FileDownloadSink for DirectoryDownloadSink {
    type Link = StagedFile;

    fn stage(&mut self, file: &DownloadFile) -> Result<StagedFile, ReportError> {
        StagedFile::write(&self.dir, &file.file_name, &file.contents)
    }

    fn click(&mut self, link: &mut StagedFile) -> Result<(), ReportError> {
        link.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("report-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("Không tạo được thư mục tạm");
        dir
    }

    #[test]
    fn download_commits_and_leaves_no_staging_file() {
        let dir = scratch_dir("download");
        let mut sink = DirectoryDownloadSink::new(&dir);
        let file = DownloadFile {
            file_name: "patient_report_A_undated.json".to_string(),
            mime: report_export::JSON_MIME,
            contents: b"{}".to_vec(),
        };

        let mut link = Scoped::new(sink.stage(&file).expect("Stage thất bại"));
        sink.click(&mut link).expect("Commit thất bại");
        drop(link);

        assert_eq!(
            fs::read_to_string(dir.join("patient_report_A_undated.json")).unwrap(),
            "{}"
        );
        assert!(!dir.join(".patient_report_A_undated.json.part").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn uncommitted_staging_file_is_removed() {
        let dir = scratch_dir("abandon");
        let mut sink = DirectoryDownloadSink::new(&dir);
        let file = DownloadFile {
            file_name: "report.json".to_string(),
            mime: report_export::JSON_MIME,
            contents: b"{}".to_vec(),
        };

        let link = Scoped::new(sink.stage(&file).expect("Stage thất bại"));
        assert!(dir.join(".report.json.part").exists());
        drop(link);

        assert!(!dir.join(".report.json.part").exists());
        assert!(!dir.join("report.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn path_separators_are_rejected() {
        let dir = scratch_dir("reject");
        let mut sink = DirectoryDownloadSink::new(&dir);
        let file = DownloadFile {
            file_name: "../escape.json".to_string(),
            mime: report_export::JSON_MIME,
            contents: Vec::new(),
        };
        assert!(matches!(
            sink.stage(&file),
            Err(ReportError::InvalidFileName(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn printable_report_is_written_as_html() {
        let dir = scratch_dir("print");
        let mut sink = HtmlFilePrintSink::new(&dir, "Jane_Doe_unknown".to_string());
        let surface = sink
            .open_surface("<html></html>")
            .expect("Mở khung in thất bại")
            .expect("Khung in bị từ chối");
        sink.print_when_loaded(Scoped::new(surface))
            .expect("In thất bại");

        assert_eq!(
            fs::read_to_string(dir.join("Jane_Doe_unknown.html")).unwrap(),
            "<html></html>"
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
