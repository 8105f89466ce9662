//! Sink trong bộ nhớ, ghi lại những gì lẽ ra đã giao cho host.

use std::cell::Cell;
use std::rc::Rc;

use report_core::ReportError;

use crate::{DocumentSink, DownloadFile, FileDownloadSink, PrintSink, Scoped, TransientResource};

/// Ghi lại tài liệu được in thay vì mở hộp thoại in.
#[derive(Debug, Default)]
pub struct RecordingPrintSink {
    pub printed: Vec<String>,
    refuse: bool,
    releases: Rc<Cell<usize>>,
}

impl RecordingPrintSink {
    /// Sink mà host luôn từ chối mở khung, như khi popup bị chặn.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Số khung in đã được giải phóng.
    pub fn released(&self) -> usize {
        self.releases.get()
    }
}

#[derive(Debug)]
pub struct RecordedSurface {
    document: String,
    releases: Rc<Cell<usize>>,
}

impl TransientResource for RecordedSurface {
    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl DocumentSink for RecordingPrintSink {}

impl PrintSink for RecordingPrintSink {
    type Surface = RecordedSurface;

    fn open_surface(&mut self, document: &str) -> Result<Option<RecordedSurface>, ReportError> {
        if self.refuse {
            return Ok(None);
        }
        Ok(Some(RecordedSurface {
            document: document.to_string(),
            releases: Rc::clone(&self.releases),
        }))
    }

    /// Khung trong bộ nhớ coi như đã tải xong ngay khi được tạo.
    fn print_when_loaded(&mut self, surface: Scoped<RecordedSurface>) -> Result<(), ReportError> {
        self.printed.push(surface.document.clone());
        Ok(())
    }
}

/// Ghi lại file tải về thay vì đụng tới hệ thống file.
#[derive(Debug, Default)]
pub struct RecordingDownloadSink {
    pub downloads: Vec<DownloadFile>,
    fail_clicks: bool,
    releases: Rc<Cell<usize>>,
}

impl RecordingDownloadSink {
    /// Sink mà cú click giả lập luôn thất bại.
    pub fn failing_clicks() -> Self {
        Self {
            fail_clicks: true,
            ..Self::default()
        }
    }

    /// Số link tạm đã được giải phóng.
    pub fn released(&self) -> usize {
        self.releases.get()
    }
}

#[derive(Debug)]
pub struct RecordedLink {
    file: DownloadFile,
    releases: Rc<Cell<usize>>,
}

impl TransientResource for RecordedLink {
    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl DocumentSink for RecordingDownloadSink {}

impl FileDownloadSink for RecordingDownloadSink {
    type Link = RecordedLink;

    fn stage(&mut self, file: &DownloadFile) -> Result<RecordedLink, ReportError> {
        Ok(RecordedLink {
            file: file.clone(),
            releases: Rc::clone(&self.releases),
        })
    }

    fn click(&mut self, link: &mut RecordedLink) -> Result<(), ReportError> {
        if self.fail_clicks {
            return Err(ReportError::Host("Cú click tải file bị từ chối".to_string()));
        }
        self.downloads.push(link.file.clone());
        Ok(())
    }
}
