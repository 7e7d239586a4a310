//! Container readiness via `getComputedStyle`.

use tinymce_embed_core::ReadinessProbe;

/// Ready when the container exists and the browser returns a computed style
/// for it.
///
/// Firefox returns `null` from `getComputedStyle` for elements inside an
/// iframe that is not displayed (bugzilla 548397), and TinyMCE crashes if it
/// initializes there.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComputedStyleProbe;

impl ReadinessProbe for ComputedStyleProbe {
    fn is_ready(&self, container_id: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let Some(document) = window.document() else {
            return false;
        };
        let Some(element) = document.get_element_by_id(container_id) else {
            tracing::trace!(%container_id, "container not in the document yet");
            return false;
        };
        matches!(window.get_computed_style(&element), Ok(Some(_)))
    }
}
