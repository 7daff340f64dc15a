use js_sys::Promise;
use log::info;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlCanvasElement;

use crate::data_url::{DataUrl, PNG_MIME};
use crate::error::{js_error_text, ExportError};

/// Looks up the `html2canvas` global the host page loads via `<script>`.
///
/// 호출 시점에 조회한다. 모듈 초기화보다 늦게 로드돼도 동작해야 한다.
fn rasterizer() -> Result<js_sys::Function, ExportError> {
    let func = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("html2canvas"))
        .map_err(|e| ExportError::Rasterize(js_error_text(&e)))?;
    func.dyn_into::<js_sys::Function>()
        .map_err(|_| ExportError::Rasterize("html2canvas global is not loaded".into()))
}

/// Rasterizes the document body into a canvas and returns the snapshot as a
/// PNG data URL.
pub async fn capture_body_as_image() -> Result<DataUrl, ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Dom("no window object".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Dom("no document on window".into()))?;
    let body = document
        .body()
        .ok_or_else(|| ExportError::Dom("document has no body".into()))?;

    let promise: Promise = rasterizer()?
        .call1(&JsValue::NULL, &body)
        .map_err(|e| ExportError::Rasterize(js_error_text(&e)))?
        .dyn_into()
        .map_err(|_| ExportError::Rasterize("rasterizer did not return a promise".into()))?;

    // 페이지가 복잡할수록 렌더링 대기 시간이 길어진다
    let rendered = JsFuture::from(promise)
        .await
        .map_err(|e| ExportError::Rasterize(js_error_text(&e)))?;
    let canvas: HtmlCanvasElement = rendered
        .dyn_into()
        .map_err(|_| ExportError::Rasterize("rasterizer did not resolve to a canvas".into()))?;

    let raw = canvas
        .to_data_url_with_type(PNG_MIME)
        .map_err(|e| ExportError::Encode(js_error_text(&e)))?;
    info!("captured document body as {}x{} canvas", canvas.width(), canvas.height());

    DataUrl::parse(raw)
}
