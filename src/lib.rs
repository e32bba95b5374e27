use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod formatter;
pub mod types;

use crate::app::{ChatApp, ChatAppProps};
use crate::config::WidgetConfig;

/// Mounts the widget on `#root`. The element's `data-api-base` and
/// `data-log-level` attributes override the defaults.
#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("document not available")?;
    let root = document
        .get_element_by_id("root")
        .ok_or("#root element not found")?;

    let (config, problems) = WidgetConfig::from_attributes(
        root.get_attribute("data-api-base"),
        root.get_attribute("data-log-level"),
    );
    if let Some(level) = config.console_level() {
        wasm_logger::init(wasm_logger::Config::new(level));
    }
    for problem in problems {
        log::warn!("{}; using default", problem);
    }
    log::info!("chat API at {}", config.api.base_url());

    yew::Renderer::<ChatApp>::with_root_and_props(root, ChatAppProps { config: config.api }).render();
    Ok(())
}
