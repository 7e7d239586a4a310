//! Seams for the editor runtime.
//!
//! The bridge never looks inside an editor. It only needs to read and write
//! content, subscribe to named events, and ask the runtime's registry to
//! create, find and remove instances.

use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::events::EditorEvent;

/// Listener registered on an editor instance.
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// Setup callback run against a freshly constructed instance, before the
/// editor finishes its own initialization.
pub type SetupFn<W> = Box<dyn FnOnce(&W)>;

/// Handle to one live editor instance.
///
/// Handles are cheap to clone and all clones refer to the same instance.
pub trait EditorWidget: Clone + 'static {
    /// Raw event payload delivered to listeners.
    type Event: 'static;

    /// Current content as serialized by the editor.
    fn content(&self) -> String;

    /// Replace the editor content.
    fn set_content(&self, content: &str);

    /// Subscribe to an editor event for the lifetime of the instance.
    fn on(&self, event: EditorEvent, listener: Listener<Self::Event>);
}

/// The editor runtime's process-wide instance store.
///
/// Calls may fail for reasons the bridge does not control (instance already
/// gone, runtime not loaded), so every method that mutates is fallible.
pub trait WidgetRegistry {
    type Widget: EditorWidget;

    /// Create and attach an instance for `options["selector"]`.
    ///
    /// `setup` runs with the new instance once it is constructed.
    fn init(
        &self,
        options: Map<String, Value>,
        setup: SetupFn<Self::Widget>,
    ) -> Result<(), RegistryError>;

    /// Look up the live instance for an identity.
    fn get(&self, identity: &str) -> Option<Self::Widget>;

    /// Destroy the instance registered under `identity`.
    ///
    /// Every listener registered through [`EditorWidget::on`] is released, so
    /// nothing captured by them outlives the instance.
    fn remove_editor(&self, force: bool, identity: &str) -> Result<(), RegistryError>;
}
