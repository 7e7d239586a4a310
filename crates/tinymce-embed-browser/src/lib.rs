//! Browser layer for embedding TinyMCE.
//!
//! This crate binds the lifecycle bridge from `tinymce-embed-core` to a real
//! page. It assumes a `wasm32-unknown-unknown` target with the tinymce script
//! already loaded.
//!
//! # Architecture
//!
//! - `tinymce`: the `tinymce` global as a `WidgetRegistry`, editors as `EditorWidget`
//! - `readiness`: `getComputedStyle` container readiness
//! - `timer`: `setTimeout` scheduling via gloo-timers
//! - `logging`: tracing-wasm console subscriber
//! - `component`: Dioxus component (feature `dioxus`)
//!
//! # Re-exports
//!
//! This crate re-exports `tinymce-embed-core` for convenience, so consumers
//! only need to depend on `tinymce-embed-browser`.

// Re-export core crate
pub use tinymce_embed_core;
pub use tinymce_embed_core::*;

pub mod logging;
pub mod readiness;
pub mod timer;
pub mod tinymce;

#[cfg(feature = "dioxus")]
pub mod component;

pub use logging::init_tracing;
pub use readiness::ComputedStyleProbe;
pub use timer::TimeoutScheduler;
pub use tinymce::{BrowserEditor, TinyMceRegistry};

#[cfg(feature = "dioxus")]
pub use component::{TinyMce, TinyMceProps};

/// Controller wired to the page's tinymce runtime.
pub type BrowserController =
    LifecycleController<TinyMceRegistry, ComputedStyleProbe, TimeoutScheduler>;

/// Controller for one embedding with the default bridge options.
pub fn browser_controller(props: EmbedProps<BrowserEditor>) -> BrowserController {
    LifecycleController::new(
        TinyMceRegistry::new(),
        ComputedStyleProbe,
        TimeoutScheduler,
        props,
    )
}
