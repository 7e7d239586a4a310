//! Mount/update/unmount state machine for one embedded editor.
//!
//! The host framework drives this through its lifecycle hooks; the editor
//! instance is treated as an owned resource that is created and destroyed
//! here and never asked about its own lifecycle.
//!
//! ```text
//!            mount / recreate
//! Unmounted ─────────────────▶ PendingInit ──(container ready)──▶ Active
//!     ▲                          │    ▲                            │  │
//!     │                          └────┘ deferred retry             │  │ content-only
//!     └───────────── unmount / destroy half of recreate ───────────┘  └─▶ Active
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smol_str::SmolStr;

use crate::config::{BridgeOptions, EditorConfig};
use crate::content::{ContentStamp, ContentSynchronizer, ContentWrite};
use crate::events::{EventBridge, EventHandlers};
use crate::identity::IdentityAllocator;
use crate::surface::Surface;
use crate::visibility::{ReadinessProbe, Scheduler, VisibilityGate};
use crate::widget::{EditorWidget, WidgetRegistry};

/// User hook run on every new instance after the bridge has wired it.
pub type SetupHook<W> = Rc<dyn Fn(&W)>;

/// Props the host passes to an embedding.
pub struct EmbedProps<W: EditorWidget> {
    pub config: EditorConfig,
    pub content: String,
    /// Allocated by the controller when absent.
    pub identity: Option<SmolStr>,
    pub class_name: Option<String>,
    pub name: Option<String>,
    pub handlers: EventHandlers<W>,
    pub setup: Option<SetupHook<W>>,
}

impl<W: EditorWidget> EmbedProps<W> {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn identity(mut self, identity: impl Into<SmolStr>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn handlers(mut self, handlers: EventHandlers<W>) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn setup(mut self, setup: impl Fn(&W) + 'static) -> Self {
        self.setup = Some(Rc::new(setup));
        self
    }

    /// Whether the host should re-render the container when moving to `next`.
    ///
    /// Content never triggers a re-render: once attached, the editor owns what
    /// the container displays. Identity is the container id, so it must reach
    /// the render path.
    pub fn render_required(&self, next: &Self) -> bool {
        self.config != next.config || self.identity != next.identity
    }
}

impl<W: EditorWidget> Default for EmbedProps<W> {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            content: String::new(),
            identity: None,
            class_name: None,
            name: None,
            handlers: EventHandlers::new(),
            setup: None,
        }
    }
}

impl<W: EditorWidget> Clone for EmbedProps<W> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            content: self.content.clone(),
            identity: self.identity.clone(),
            class_name: self.class_name.clone(),
            name: self.name.clone(),
            handlers: self.handlers.clone(),
            setup: self.setup.clone(),
        }
    }
}

impl<W: EditorWidget> fmt::Debug for EmbedProps<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedProps")
            .field("config", &self.config)
            .field("content_len", &self.content.len())
            .field("identity", &self.identity)
            .field("class_name", &self.class_name)
            .field("name", &self.name)
            .field("handlers", &self.handlers)
            .field("setup", &self.setup.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Unmounted,
    /// Waiting for the container to become render-ready.
    PendingInit,
    Active,
}

/// Outcome of evaluating a host update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Configuration or identity changed: destroy and initialize again.
    Recreate,
    /// Only content changed: handed to the content synchronizer.
    UpdateContent,
    Unchanged,
}

/// Read-only view of the embedding's bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddingInstance {
    pub identity: SmolStr,
    pub is_initialized: bool,
    pub last_content_stamp: ContentStamp,
    /// Stamp issued when the live instance was constructed.
    pub instance_stamp: Option<ContentStamp>,
    pub pending_deferral: bool,
}

struct ControllerState<W: EditorWidget, P, S: Scheduler> {
    props: EmbedProps<W>,
    identity: SmolStr,
    /// Identity the live instance was registered under. `Some` iff initialized.
    live_identity: Option<SmolStr>,
    instance_stamp: Option<ContentStamp>,
    phase: LifecycleState,
    surface: Surface,
    gate: VisibilityGate<P, S>,
}

struct Shared<R: WidgetRegistry, P, S: Scheduler> {
    registry: R,
    options: BridgeOptions,
    bridge: EventBridge<R::Widget>,
    sync: ContentSynchronizer,
    state: RefCell<ControllerState<R::Widget, P, S>>,
}

/// Owns one embedded editor across host updates.
///
/// Borrows of the internal state are never held across calls into the
/// registry, the editor, or host callbacks, so a host callback may re-enter
/// the controller (for example an `onChange` that immediately pushes new
/// props).
pub struct LifecycleController<R, P, S>
where
    R: WidgetRegistry + 'static,
    P: ReadinessProbe + 'static,
    S: Scheduler + 'static,
{
    shared: Rc<Shared<R, P, S>>,
}

impl<R, P, S> LifecycleController<R, P, S>
where
    R: WidgetRegistry + 'static,
    P: ReadinessProbe + 'static,
    S: Scheduler + 'static,
{
    pub fn new(registry: R, probe: P, scheduler: S, props: EmbedProps<R::Widget>) -> Self {
        Self::with_options(registry, probe, scheduler, props, BridgeOptions::default())
    }

    /// Build the controller for a component about to mount. The identity is
    /// allocated here so the first render already carries it.
    pub fn with_options(
        registry: R,
        probe: P,
        scheduler: S,
        props: EmbedProps<R::Widget>,
        options: BridgeOptions,
    ) -> Self {
        let identity = IdentityAllocator::allocate(props.identity.as_deref());
        let surface = Surface::build(
            &identity,
            &props.config,
            &props.content,
            props.class_name.as_deref(),
            props.name.as_deref(),
        );
        let gate = VisibilityGate::with_delay(probe, scheduler, options.init_retry_delay);
        let bridge = EventBridge::new(props.handlers.clone());

        Self {
            shared: Rc::new(Shared {
                registry,
                options,
                bridge,
                sync: ContentSynchronizer::new(),
                state: RefCell::new(ControllerState {
                    props,
                    identity,
                    live_identity: None,
                    instance_stamp: None,
                    phase: LifecycleState::Unmounted,
                    surface,
                    gate,
                }),
            }),
        }
    }

    /// Host mounted the container: initialize the editor, or defer until the
    /// container is ready.
    pub fn mount(&self) {
        if !self.shared.sync.is_alive() {
            tracing::warn!(identity = %self.identity(), "mount after unmount ignored");
            return;
        }
        if self.state() != LifecycleState::Unmounted {
            return;
        }
        Self::initialize(&self.shared);
    }

    /// Host is about to apply new props. Evaluates, in order: configuration or
    /// identity change, then content change, then nothing.
    ///
    /// Callback slots are always replaced with `next.handlers`.
    pub fn props_will_change(&self, next: EmbedProps<R::Widget>) -> UpdateDecision {
        let shared = &self.shared;
        let decision = {
            let st = shared.state.borrow();
            if st.props.config != next.config || st.props.identity != next.identity {
                UpdateDecision::Recreate
            } else if st.props.content != next.content {
                UpdateDecision::UpdateContent
            } else {
                UpdateDecision::Unchanged
            }
        };
        shared.bridge.set_handlers(next.handlers.clone());

        match decision {
            UpdateDecision::Recreate => {
                {
                    let mut guard = shared.state.borrow_mut();
                    let st = &mut *guard;
                    if st.props.identity != next.identity {
                        st.identity = IdentityAllocator::allocate(next.identity.as_deref());
                    }
                    st.surface = Surface::build(
                        &st.identity,
                        &next.config,
                        &next.content,
                        next.class_name.as_deref(),
                        next.name.as_deref(),
                    );
                    st.props = next;
                    tracing::debug!(identity = %st.identity, "configuration changed, recreating editor");
                }
                if shared.sync.is_alive() {
                    Self::destroy_live(shared);
                    Self::initialize(shared);
                }
            }
            UpdateDecision::UpdateContent => {
                let (identity, content) = {
                    let mut st = shared.state.borrow_mut();
                    st.props = next;
                    (st.identity.clone(), st.props.content.clone())
                };
                match shared.registry.get(&identity) {
                    Some(widget) => {
                        if shared.sync.on_update_content(&widget, &content) == ContentWrite::Written {
                            tracing::trace!(%identity, "host content pushed to editor");
                        }
                    }
                    // Not attached yet; a pending initialization reads the
                    // latest props when it runs.
                    None => tracing::trace!(%identity, "no live editor for content update"),
                }
            }
            UpdateDecision::Unchanged => {
                shared.state.borrow_mut().props = next;
            }
        }

        decision
    }

    /// Markup to render. Only changes when the editor is recreated.
    pub fn surface(&self) -> Surface {
        self.shared.state.borrow().surface.clone()
    }

    /// Host is removing the component. Cancels any deferred initialization,
    /// invalidates pending content writes and destroys the editor.
    ///
    /// Idempotent, and always completes: registry failures are logged.
    pub fn unmount(&self) {
        let shared = &self.shared;
        let identity = {
            let mut guard = shared.state.borrow_mut();
            let st = &mut *guard;
            st.gate.cancel();
            st.phase = LifecycleState::Unmounted;
            st.instance_stamp = None;
            st.live_identity.take().unwrap_or_else(|| st.identity.clone())
        };
        shared.sync.shutdown();
        Self::remove(shared, &identity);
    }

    pub fn identity(&self) -> SmolStr {
        self.shared.state.borrow().identity.clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.state.borrow().phase
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.state.borrow().live_identity.is_some()
    }

    /// The live editor, looked up in the registry.
    pub fn instance(&self) -> Option<R::Widget> {
        let identity = self.shared.state.borrow().live_identity.clone()?;
        self.shared.registry.get(&identity)
    }

    pub fn instance_state(&self) -> EmbeddingInstance {
        let st = self.shared.state.borrow();
        EmbeddingInstance {
            identity: st.identity.clone(),
            is_initialized: st.live_identity.is_some(),
            last_content_stamp: self.shared.sync.current_stamp(),
            instance_stamp: st.instance_stamp,
            pending_deferral: st.gate.has_pending(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.shared.registry
    }

    fn initialize(shared: &Rc<Shared<R, P, S>>) {
        let (identity, ready) = {
            let st = shared.state.borrow();
            (st.identity.clone(), st.gate.is_ready(&st.identity))
        };

        if !ready {
            let weak: Weak<Shared<R, P, S>> = Rc::downgrade(shared);
            let mut st = shared.state.borrow_mut();
            st.phase = LifecycleState::PendingInit;
            st.gate.defer_init(Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                shared.state.borrow_mut().gate.mark_fired();
                if shared.sync.is_alive() {
                    Self::initialize(&shared);
                }
            }));
            tracing::debug!(%identity, delay = ?st.gate.delay(), "container not ready, deferring editor init");
            return;
        }

        shared.state.borrow_mut().gate.cancel();
        Self::destroy_live(shared);

        let (options, content, setup) = {
            let st = shared.state.borrow();
            (
                st.props.config.init_options(&identity),
                st.props.content.clone(),
                st.props.setup.clone(),
            )
        };

        let bridge = shared.bridge.clone();
        let sync = shared.sync.clone();
        let weak = Rc::downgrade(shared);
        let setup_fn = Box::new(move |widget: &R::Widget| {
            bridge.wire(widget);
            let stamp = sync.on_initialize(widget, content);
            if let Some(shared) = weak.upgrade() {
                shared.state.borrow_mut().instance_stamp = Some(stamp);
            }
            if let Some(setup) = setup {
                setup(widget);
            }
        });

        match shared.registry.init(options, setup_fn) {
            Ok(()) => {
                let mut st = shared.state.borrow_mut();
                st.live_identity = Some(identity.clone());
                st.phase = LifecycleState::Active;
                tracing::info!(%identity, "editor initialized");
            }
            Err(e) => {
                let mut st = shared.state.borrow_mut();
                st.phase = LifecycleState::Unmounted;
                st.instance_stamp = None;
                tracing::warn!(%identity, "editor init failed: {}", e);
            }
        }
    }

    /// Destroy the live instance, if there is one.
    fn destroy_live(shared: &Shared<R, P, S>) {
        let live = {
            let mut st = shared.state.borrow_mut();
            st.instance_stamp = None;
            st.phase = LifecycleState::Unmounted;
            st.live_identity.take()
        };
        if let Some(identity) = live {
            Self::remove(shared, &identity);
        }
    }

    fn remove(shared: &Shared<R, P, S>, identity: &str) {
        match shared
            .registry
            .remove_editor(shared.options.force_remove, identity)
        {
            Ok(()) => tracing::debug!(%identity, "editor removed"),
            // Happens e.g. when a component mounts and unmounts before the
            // editor finished initializing.
            Err(e) => tracing::warn!(%identity, "error removing editor: {}", e),
        }
    }
}

impl<R, P, S> fmt::Debug for LifecycleController<R, P, S>
where
    R: WidgetRegistry + 'static,
    P: ReadinessProbe + 'static,
    S: Scheduler + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("state", &self.state())
            .field("instance", &self.instance_state())
            .finish()
    }
}
