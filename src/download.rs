use std::sync::OnceLock;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlElement};

use crate::data_url::DataUrl;
use crate::error::{js_error_text, ExportError};

const DEFAULT_FILENAME: &str = "report.png";

static EXPORT_FILENAME: OnceLock<String> = OnceLock::new();

/// Overrides the filename suggested for downloads. First call wins.
#[wasm_bindgen]
pub fn set_export_filename(name: String) {
    if name.trim().is_empty() {
        warn!("ignoring empty export filename");
        return;
    }
    if EXPORT_FILENAME.set(name).is_err() {
        warn!("export filename is already set; keeping the first value");
    }
}

pub fn export_filename() -> String {
    EXPORT_FILENAME
        .get()
        .cloned()
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// 다운로드 전용 임시 앵커. 값이 스코프를 벗어나면 문서 트리에서 제거된다.
pub struct AnchorGuard {
    body: HtmlElement,
    anchor: HtmlAnchorElement,
}

impl AnchorGuard {
    /// Creates an anchor pointing at `image` and attaches it to the body.
    pub fn attach(
        document: &Document,
        image: &DataUrl,
        filename: &str,
    ) -> Result<Self, ExportError> {
        let body = document
            .body()
            .ok_or_else(|| ExportError::Dom("document has no body".into()))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| ExportError::Dom(js_error_text(&e)))?
            .dyn_into()
            .map_err(|_| ExportError::Dom("created element is not an anchor".into()))?;
        anchor.set_href(image.as_str());
        anchor.set_download(filename);

        // 일부 브라우저는 download 속성이 동작하려면 앵커가 트리에 붙어 있어야 한다
        body.append_child(&anchor)
            .map_err(|e| ExportError::Dom(js_error_text(&e)))?;

        Ok(Self { body, anchor })
    }

    /// Synthesizes the click that starts the download.
    pub fn click(&self) {
        self.anchor.click();
    }
}

impl Drop for AnchorGuard {
    fn drop(&mut self) {
        let _ = self.body.remove_child(&self.anchor);
    }
}

/// Offers `image` to the browser as a file download named `filename`.
///
/// Fire-and-forget: 브라우저가 저장 여부를 알려주지 않는다.
pub fn download_image(
    document: &Document,
    image: &DataUrl,
    filename: &str,
) -> Result<(), ExportError> {
    let guard = AnchorGuard::attach(document, image, filename)?;
    guard.click();
    info!("offered download '{filename}' ({})", image.mime());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // OnceLock은 프로세스 전역이라 한 테스트 안에서만 검증한다
    #[test]
    fn filename_defaults_then_locks_to_first_override() {
        assert_eq!(export_filename(), "report.png");

        set_export_filename(String::new());
        assert_eq!(export_filename(), "report.png");

        set_export_filename("floor-plan.png".to_string());
        assert_eq!(export_filename(), "floor-plan.png");

        set_export_filename("ignored.png".to_string());
        assert_eq!(export_filename(), "floor-plan.png");
    }
}
