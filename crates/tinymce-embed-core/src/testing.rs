//! In-memory stand-ins for the editor runtime, the platform and the event loop.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::error::RegistryError;
use crate::events::EditorEvent;
use crate::visibility::{ReadinessProbe, Scheduler};
use crate::widget::{EditorWidget, Listener, SetupFn, WidgetRegistry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockEvent {
    pub kind: EditorEvent,
}

struct WidgetInner {
    id: SmolStr,
    content: RefCell<String>,
    writes: RefCell<Vec<String>>,
    listeners: RefCell<Vec<(EditorEvent, Listener<MockEvent>)>>,
    detached: Cell<bool>,
}

#[derive(Clone)]
pub struct MockWidget(Rc<WidgetInner>);

impl MockWidget {
    pub fn new(id: &str) -> Self {
        Self::with_content(id, "")
    }

    pub fn with_content(id: &str, content: &str) -> Self {
        Self(Rc::new(WidgetInner {
            id: id.into(),
            content: RefCell::new(content.to_owned()),
            writes: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            detached: Cell::new(false),
        }))
    }

    pub fn id(&self) -> &SmolStr {
        &self.0.id
    }

    /// Content writes made through `set_content`, in order.
    pub fn writes(&self) -> Vec<String> {
        self.0.writes.borrow().clone()
    }

    /// Simulate the user editing without going through `set_content`.
    pub fn type_text(&self, content: &str) {
        *self.0.content.borrow_mut() = content.to_owned();
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    pub fn emit(&self, kind: EditorEvent) {
        let event = MockEvent { kind };
        // Run without holding the borrow so listeners may subscribe.
        let mut listeners = std::mem::take(&mut *self.0.listeners.borrow_mut());
        for (registered, listener) in listeners.iter_mut() {
            if *registered == kind {
                listener(&event);
            }
        }
        if self.0.detached.get() {
            // Removed by one of the listeners; drop them here.
            return;
        }
        let mut slot = self.0.listeners.borrow_mut();
        listeners.append(&mut slot);
        *slot = listeners;
    }

    /// Drop every listener, as the runtime does when an editor is removed.
    fn detach(&self) {
        self.0.detached.set(true);
        let listeners = std::mem::take(&mut *self.0.listeners.borrow_mut());
        drop(listeners);
    }
}

impl EditorWidget for MockWidget {
    type Event = MockEvent;

    fn content(&self) -> String {
        self.0.content.borrow().clone()
    }

    fn set_content(&self, content: &str) {
        *self.0.content.borrow_mut() = content.to_owned();
        self.0.writes.borrow_mut().push(content.to_owned());
    }

    fn on(&self, event: EditorEvent, listener: Listener<MockEvent>) {
        if !self.0.detached.get() {
            self.0.listeners.borrow_mut().push((event, listener));
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    live: HashMap<SmolStr, MockWidget>,
    created: Vec<MockWidget>,
    init_options: Vec<Map<String, Value>>,
    removed: Vec<SmolStr>,
    failed_removals: usize,
    fail_init: bool,
}

/// Registry keyed by the `#id` selector, recording every call.
#[derive(Clone, Default)]
pub struct MockRegistry(Rc<RefCell<RegistryInner>>);

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_init(&self, fail: bool) {
        self.0.borrow_mut().fail_init = fail;
    }

    /// Every instance ever constructed, oldest first.
    pub fn created(&self) -> Vec<MockWidget> {
        self.0.borrow().created.clone()
    }

    pub fn init_options(&self) -> Vec<Map<String, Value>> {
        self.0.borrow().init_options.clone()
    }

    /// Identities successfully removed, in order.
    pub fn removed(&self) -> Vec<SmolStr> {
        self.0.borrow().removed.clone()
    }

    pub fn failed_removals(&self) -> usize {
        self.0.borrow().failed_removals
    }

    pub fn live_count(&self) -> usize {
        self.0.borrow().live.len()
    }
}

impl WidgetRegistry for MockRegistry {
    type Widget = MockWidget;

    fn init(
        &self,
        options: Map<String, Value>,
        setup: SetupFn<MockWidget>,
    ) -> Result<(), RegistryError> {
        let selector = options
            .get("selector")
            .and_then(Value::as_str)
            .ok_or_else(|| RegistryError::Runtime("missing selector".into()))?;
        let id = SmolStr::new(selector.trim_start_matches('#'));

        let widget = {
            let mut inner = self.0.borrow_mut();
            inner.init_options.push(options.clone());
            if inner.fail_init {
                return Err(RegistryError::Runtime("init failed".into()));
            }
            if inner.live.contains_key(&id) {
                return Err(RegistryError::AlreadyExists(id));
            }
            let widget = MockWidget::new(&id);
            inner.live.insert(id, widget.clone());
            inner.created.push(widget.clone());
            widget
        };
        setup(&widget);
        Ok(())
    }

    fn get(&self, identity: &str) -> Option<MockWidget> {
        self.0.borrow().live.get(identity).cloned()
    }

    fn remove_editor(&self, _force: bool, identity: &str) -> Result<(), RegistryError> {
        let removed = {
            let mut inner = self.0.borrow_mut();
            let removed = inner.live.remove(identity);
            match removed {
                Some(_) => inner.removed.push(identity.into()),
                None => inner.failed_removals += 1,
            }
            removed
        };
        // Listeners may hold anything, so drop them outside the borrow.
        match removed {
            Some(widget) => {
                widget.detach();
                Ok(())
            }
            None => Err(RegistryError::NotFound(identity.into())),
        }
    }
}

/// Readiness flag shared with the test.
#[derive(Clone)]
pub struct FlagProbe(Rc<Cell<bool>>);

impl FlagProbe {
    pub fn new(ready: bool) -> Self {
        Self(Rc::new(Cell::new(ready)))
    }

    pub fn set(&self, ready: bool) {
        self.0.set(ready);
    }
}

impl ReadinessProbe for FlagProbe {
    fn is_ready(&self, _container_id: &str) -> bool {
        self.0.get()
    }
}

type Task = (u64, Duration, Box<dyn FnOnce()>);

#[derive(Default)]
struct SchedulerInner {
    next_id: u64,
    tasks: Vec<Task>,
}

/// Timers that only fire when the test says so.
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<SchedulerInner>>);

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.0.borrow().tasks.len()
    }

    pub fn pending_delays(&self) -> Vec<Duration> {
        self.0.borrow().tasks.iter().map(|(_, d, _)| *d).collect()
    }

    /// Run everything scheduled so far. Tasks scheduled while running wait
    /// for the next call.
    pub fn run_due(&self) {
        let tasks = std::mem::take(&mut self.0.borrow_mut().tasks);
        for (_, _, action) in tasks {
            action();
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn schedule(&self, delay: Duration, action: Box<dyn FnOnce()>) -> u64 {
        let mut inner = self.0.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.tasks.push((id, delay, action));
        id
    }

    fn cancel(&self, handle: u64) {
        self.0.borrow_mut().tasks.retain(|(id, _, _)| *id != handle);
    }
}
