use std::cell::RefCell;
use std::rc::Rc;

use report_core::{ReportConfig, ReportError};
use report_export::{
    DocumentSink, DownloadFile, FileDownloadSink, PrintSink, Scoped, TransientResource,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlIFrameElement, Url, Window};

fn host_error(context: &str, err: JsValue) -> ReportError {
    ReportError::Host(format!("{context}: {err:?}"))
}

fn window_and_document() -> Option<(Window, Document)> {
    let window = web_sys::window()?;
    let document = window.document()?;
    Some((window, document))
}

fn object_url(parts: &js_sys::Array, mime: &str) -> Result<String, ReportError> {
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(parts, &opts)
        .map_err(|err| host_error("Không tạo được blob", err))?;
    Url::create_object_url_with_blob(&blob)
        .map_err(|err| host_error("Không tạo được object URL", err))
}

/// Khung in ẩn (iframe) trỏ tới blob chứa tài liệu HTML.
pub struct IframeSurface {
    iframe: HtmlIFrameElement,
    url: String,
}

impl TransientResource for IframeSurface {
    fn release(&mut self) {
        self.iframe.remove();
        if let Err(err) = Url::revoke_object_url(&self.url) {
            web_sys::console::warn_1(&err);
        }
    }
}

/// In báo cáo qua iframe ẩn, sau khi iframe báo đã tải xong.
pub struct IframePrintSink {
    fallback_ms: i32,
    cleanup_ms: i32,
}

impl IframePrintSink {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            fallback_ms: clamp_ms(config.print_fallback_ms),
            cleanup_ms: clamp_ms(config.print_cleanup_ms),
        }
    }
}

fn clamp_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

impl DocumentSink for IframePrintSink {}

impl PrintSink for IframePrintSink {
    type Surface = IframeSurface;

    fn open_surface(&mut self, document: &str) -> Result<Option<IframeSurface>, ReportError> {
        let Some((_, dom)) = window_and_document() else {
            return Ok(None);
        };
        let Some(body) = dom.body() else {
            return Ok(None);
        };

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(document.as_bytes()));
        let url = object_url(&parts, "text/html")?;

        let iframe: HtmlIFrameElement = match dom
            .create_element("iframe")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlIFrameElement>().ok())
        {
            Some(iframe) => iframe,
            None => {
                let _ = Url::revoke_object_url(&url);
                return Ok(None);
            }
        };
        let style = iframe.style();
        for (property, value) in [
            ("position", "fixed"),
            ("right", "0"),
            ("bottom", "0"),
            ("width", "0"),
            ("height", "0"),
            ("border", "0"),
        ] {
            let _ = style.set_property(property, value);
        }

        let surface = IframeSurface { iframe, url };
        surface.iframe.set_src(&surface.url);
        if body.append_child(&surface.iframe).is_err() {
            let mut surface = surface;
            surface.release();
            return Ok(None);
        }
        Ok(Some(surface))
    }

    fn print_when_loaded(&mut self, surface: Scoped<IframeSurface>) -> Result<(), ReportError> {
        let window =
            web_sys::window().ok_or_else(|| ReportError::Host("Không có window".into()))?;
        let iframe = surface.iframe.clone();
        let pending = Rc::new(RefCell::new(Some(surface)));

        // Sự kiện load và hẹn giờ dự phòng dùng chung một guard: bên nào chạy
        // trước sẽ in và lên lịch giải phóng, bên còn lại không làm gì.
        let on_loaded = print_once(window.clone(), Rc::clone(&pending), self.cleanup_ms);
        let on_fallback = print_once(window.clone(), pending, self.cleanup_ms);

        iframe.set_onload(Some(on_loaded.unchecked_ref()));
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                on_fallback.unchecked_ref(),
                self.fallback_ms,
            )
            .map_err(|err| host_error("Không đặt được hẹn giờ in", err))?;
        Ok(())
    }
}

fn print_once(
    window: Window,
    pending: Rc<RefCell<Option<Scoped<IframeSurface>>>>,
    cleanup_ms: i32,
) -> JsValue {
    Closure::once_into_js(move || {
        let Some(surface) = pending.borrow_mut().take() else {
            return;
        };
        match surface.iframe.content_window() {
            Some(frame) => {
                if let Err(err) = frame.print() {
                    web_sys::console::error_1(&err);
                }
            }
            None => web_sys::console::warn_1(&JsValue::from_str("Khung in không có nội dung")),
        }

        let release = Closure::once_into_js(move || drop(surface));
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                release.unchecked_ref(),
                cleanup_ms,
            )
            .is_err()
        {
            web_sys::console::warn_1(&JsValue::from_str(
                "Không hẹn giờ được việc dọn khung in",
            ));
        }
    })
}

/// Thẻ `<a download>` ẩn trỏ tới blob cần tải.
pub struct AnchorLink {
    anchor: HtmlAnchorElement,
    url: String,
}

impl TransientResource for AnchorLink {
    fn release(&mut self) {
        self.anchor.remove();
        if let Err(err) = Url::revoke_object_url(&self.url) {
            web_sys::console::warn_1(&err);
        }
    }
}

/// Tải file qua một thẻ `<a>` tạm, giải phóng ngay sau cú click.
pub struct AnchorDownloadSink;

impl DocumentSink for AnchorDownloadSink {}

impl FileDownloadSink for AnchorDownloadSink {
    type Link = AnchorLink;

    fn stage(&mut self, file: &DownloadFile) -> Result<AnchorLink, ReportError> {
        let (_, dom) = window_and_document()
            .ok_or_else(|| ReportError::Host("Không truy cập được document".into()))?;
        let body = dom
            .body()
            .ok_or_else(|| ReportError::Host("Document không có thẻ <body>".into()))?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.contents.as_slice()));
        let url = object_url(&parts, file.mime)?;

        let anchor: HtmlAnchorElement = match dom
            .create_element("a")
            .map_err(|err| host_error("Không tạo được thẻ <a>", err))
            .and_then(|el| {
                el.dyn_into::<HtmlAnchorElement>()
                    .map_err(|_| ReportError::Host("Ép kiểu thẻ <a> thất bại".into()))
            }) {
            Ok(anchor) => anchor,
            Err(err) => {
                let _ = Url::revoke_object_url(&url);
                return Err(err);
            }
        };
        anchor.set_href(&url);
        anchor.set_download(&file.file_name);
        let _ = anchor.style().set_property("display", "none");

        let mut link = AnchorLink { anchor, url };
        if let Err(err) = body.append_child(&link.anchor) {
            link.release();
            return Err(host_error("Không gắn được thẻ <a>", err));
        }
        Ok(link)
    }

    fn click(&mut self, link: &mut AnchorLink) -> Result<(), ReportError> {
        link.anchor.click();
        Ok(())
    }
}
