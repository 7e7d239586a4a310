//! tinymce-embed-core: lifecycle bridge between a TinyMCE editor and a
//! declarative component tree, without framework or browser dependencies.
//!
//! This crate provides:
//! - `LifecycleController` - mount/update/unmount state machine that decides
//!   between patching and recreating the editor on every host update
//! - `VisibilityGate` - deferred initialization for containers without layout
//! - `EventBridge` - static event table wired to host callback slots
//! - `ContentSynchronizer` - stamp-guarded content writes
//! - `WidgetRegistry` / `EditorWidget` / `ReadinessProbe` / `Scheduler` -
//!   seams for the editor runtime, the platform and the event loop
//!
//! Everything here is single-threaded and expects to be driven from one event
//! loop, so shared state is `Rc`/`RefCell` rather than `Arc`/`Mutex`.

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod identity;
pub mod lifecycle;
pub mod surface;
pub mod visibility;
pub mod widget;

#[cfg(test)]
mod testing;

pub use config::{BridgeOptions, EditorConfig};
pub use content::{ContentStamp, ContentSynchronizer, ContentWrite};
pub use error::{ConfigError, RegistryError};
pub use events::{EVENT_COUNT, EditorEvent, EventBridge, EventHandler, EventHandlers};
pub use identity::IdentityAllocator;
pub use lifecycle::{
    EmbedProps, EmbeddingInstance, LifecycleController, LifecycleState, SetupHook,
    UpdateDecision,
};
pub use smol_str::SmolStr;
pub use surface::Surface;
pub use visibility::{DEFAULT_INIT_DELAY, ReadinessProbe, Scheduler, VisibilityGate};
pub use widget::{EditorWidget, Listener, SetupFn, WidgetRegistry};
