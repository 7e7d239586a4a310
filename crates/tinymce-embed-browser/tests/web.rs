//! WASM browser tests for tinymce-embed-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`
//!
//! The tinymce script is not loaded in the test page, so these cover the
//! browser seams and the registry's behaviour without a runtime.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use tinymce_embed_browser::tinymce::Editor;
use tinymce_embed_browser::{
    ComputedStyleProbe, EditorConfig, EditorEvent, EditorWidget, EmbedProps, LifecycleState,
    ReadinessProbe, RegistryError, Scheduler, TimeoutScheduler, TinyMceRegistry, WidgetRegistry,
    browser_controller,
};

fn append_container(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("textarea").unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

// === Readiness ===

#[wasm_bindgen_test]
fn test_missing_container_is_not_ready() {
    assert!(!ComputedStyleProbe.is_ready("no-such-container"));
}

#[wasm_bindgen_test]
fn test_attached_container_is_ready() {
    let element = append_container("probe-attached");
    assert!(ComputedStyleProbe.is_ready("probe-attached"));
    element.remove();
}

// === Timers ===

#[wasm_bindgen_test]
async fn test_timeout_runs_action() {
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let _handle = TimeoutScheduler.schedule(
        Duration::from_millis(10),
        Box::new(move || flag.set(true)),
    );
    gloo_timers::future::TimeoutFuture::new(50).await;
    assert!(ran.get());
}

#[wasm_bindgen_test]
async fn test_cancelled_timeout_never_runs() {
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let handle = TimeoutScheduler.schedule(
        Duration::from_millis(10),
        Box::new(move || flag.set(true)),
    );
    TimeoutScheduler.cancel(handle);
    gloo_timers::future::TimeoutFuture::new(50).await;
    assert!(!ran.get());
}

// === Registry without a runtime ===

#[wasm_bindgen_test]
fn test_registry_reports_missing_runtime() {
    assert!(!TinyMceRegistry::is_available());
    let registry = TinyMceRegistry::new();
    assert!(registry.get("anything").is_none());
    assert!(matches!(
        registry.remove_editor(true, "anything"),
        Err(RegistryError::Unavailable)
    ));
}

/// Plain JS object with the `id`/`on`/`off` surface of an editor, counting
/// bound listeners.
fn stand_in_editor(id: &str) -> Editor {
    let make = js_sys::Function::new_with_args(
        "id",
        "return { id, bound: 0, on() { this.bound += 1; }, off() { this.bound -= 1; } };",
    );
    make.call1(&JsValue::NULL, &JsValue::from_str(id))
        .unwrap()
        .unchecked_into()
}

fn bound_count(editor: &Editor) -> f64 {
    js_sys::Reflect::get(editor, &JsValue::from_str("bound"))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
fn test_remove_editor_releases_listeners() {
    let registry = TinyMceRegistry::new();
    let editor = registry.editor(stand_in_editor("with-listeners"));

    let clicks = Rc::new(Cell::new(0));
    for event in [EditorEvent::Click, EditorEvent::Change] {
        let clicks = clicks.clone();
        editor.on(event, Box::new(move |_| clicks.set(clicks.get() + 1)));
    }
    assert_eq!(registry.listener_count("with-listeners"), 2);
    assert_eq!(bound_count(editor.js()), 2.0);

    // No runtime on the page, but the listeners are still freed.
    assert!(registry.remove_editor(true, "with-listeners").is_err());
    assert_eq!(registry.listener_count("with-listeners"), 0);
    assert_eq!(bound_count(editor.js()), 0.0);
    assert_eq!(Rc::strong_count(&clicks), 1);
}

#[wasm_bindgen_test]
fn test_controller_survives_missing_runtime() {
    let element = append_container("no-runtime");
    let controller =
        browser_controller(EmbedProps::new(EditorConfig::new()).identity("no-runtime"));

    controller.mount();
    assert_eq!(controller.state(), LifecycleState::Unmounted);
    assert!(!controller.is_initialized());

    // Teardown completes even though removal fails.
    controller.unmount();
    controller.unmount();
    element.remove();
}
