//! Console logging for wasm builds.

use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

/// Install a `tracing` subscriber that writes to the browser console, and a
/// panic hook that reports panics there too.
///
/// Apps that already install their own subscriber should skip this; a second
/// global default is ignored.
pub fn init_tracing(max_level: Level) {
    console_error_panic_hook::set_once();

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);
    if set_global_default(reg).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
