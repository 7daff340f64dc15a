use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can go wrong between clicking "download" and the browser
/// receiving the file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// window/document/body 접근 실패
    #[error("browser context unavailable: {0}")]
    Dom(String),

    #[error("page rasterizer failed: {0}")]
    Rasterize(String),

    #[error("canvas encoding failed: {0}")]
    Encode(String),

    #[error("malformed data url: {0}")]
    DataUrl(String),
}

impl From<ExportError> for JsValue {
    fn from(err: ExportError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a JS exception or rejection value.
pub(crate) fn js_error_text(value: &JsValue) -> String {
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 호스트 페이지 스크립트가 reject 사유 문자열에 의존한다
    #[test]
    fn display_prefixes_stay_stable() {
        let cases = [
            (
                ExportError::Dom("no window object".into()),
                "browser context unavailable: no window object",
            ),
            (
                ExportError::Rasterize("html2canvas global is not loaded".into()),
                "page rasterizer failed: html2canvas global is not loaded",
            ),
            (
                ExportError::Encode("toDataURL threw".into()),
                "canvas encoding failed: toDataURL threw",
            ),
            (
                ExportError::DataUrl("missing ',' separator".into()),
                "malformed data url: missing ',' separator",
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
