use log::{error, info};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document};

pub mod capture;
pub mod data_url;
pub mod download;
pub mod error;

use crate::capture::capture_body_as_image;
use crate::download::{download_image, export_filename};
use crate::error::ExportError;

/// What a resolved export hands back to the host page.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub filename: String,
    pub mime: String,
    pub encoded_len: usize,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).unwrap();

    info!("report export module loaded");
    Ok(())
}

/// Captures the document body and offers the snapshot as a PNG download.
///
/// resolve 시 ExportReceipt 객체, reject 시 사유 문자열을 돌려준다.
#[wasm_bindgen]
pub async fn download_report() -> Result<JsValue, JsValue> {
    match export_report().await {
        Ok(receipt) => {
            serde_wasm_bindgen::to_value(&receipt).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        Err(e) => {
            error!("report export failed: {e}");
            Err(e.into())
        }
    }
}

/// Wires the export pipeline to clicks on an existing button element.
#[wasm_bindgen]
pub fn bind_export_button(button_id: &str) -> Result<(), JsValue> {
    let document = page_document().map_err(JsValue::from)?;
    let button = document
        .get_element_by_id(button_id)
        .ok_or_else(|| JsValue::from_str(&format!("element '{button_id}' not found")))?;

    add_click_listener(&button, || {
        wasm_bindgen_futures::spawn_local(async {
            // 버튼 경로에는 reject를 전달받을 호출자가 없다
            if let Err(e) = export_report().await {
                web_sys::console::error_1(&format!("report export failed: {e}").into());
            }
        });
    });

    Ok(())
}

/// Capture 후 Package를 순서대로 실행한다.
pub async fn export_report() -> Result<ExportReceipt, ExportError> {
    let image = capture_body_as_image().await?;

    let document = page_document()?;
    let filename = export_filename();
    download_image(&document, &image, &filename)?;

    Ok(ExportReceipt {
        filename,
        mime: image.mime().to_string(),
        encoded_len: image.as_str().len(),
    })
}

// 브라우저의 Window 및 Document 객체 가져오기
fn page_document() -> Result<Document, ExportError> {
    let window = window().ok_or_else(|| ExportError::Dom("no window object".into()))?;
    window
        .document()
        .ok_or_else(|| ExportError::Dom("no document on window".into()))
}

fn add_click_listener(element: &web_sys::Element, callback: impl Fn() + 'static) {
    let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        callback();
    }) as Box<dyn FnMut(_)>);

    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()).unwrap();
    closure.forget();
}
