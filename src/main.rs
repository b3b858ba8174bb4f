//! Orivanta Site Entry Point

mod animation;
mod api;
mod chrome;
mod config;
mod error;
mod forms;
mod pages;
mod scope;
mod site;
mod utils;
mod widgets;

use any_spawner::Executor;
use log::{error, info, LevelFilter};

use config::SiteConfig;
use site::Site;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    console_error_panic_hook::set_once();
    // Verbose until the config says otherwise, so config warnings are kept
    let _ = console_logger::init(LevelFilter::Debug);
    let _ = Executor::init_wasm_bindgen();

    let document = match utils::dom::document() {
        Ok(document) => document,
        Err(e) => {
            error!("[main] {}", e);
            return;
        }
    };
    let config = SiteConfig::load(&document);
    let host = document
        .location()
        .and_then(|l| l.hostname().ok())
        .unwrap_or_default();
    log::set_max_level(config.log_level(&host));
    info!("[main] starting on {}", if host.is_empty() { "unknown host" } else { &host });

    let site = Site::from_browser(config);
    if let Err(e) = pages::boot(site) {
        error!("[main] boot failed: {}", e);
    }
}
