//! Editor event taxonomy and the bridge to host callbacks.
//!
//! The table mirrors the native DOM and custom events a TinyMCE editor emits.
//! Handler names are "on" followed by the native name with its first letter
//! upper-cased. The native names are inconsistently capitalized, so the handler
//! names are too: compare `onMouseleave` with `onNodeChange`. That is kept as-is
//! so hosts can match handler names against the editor documentation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::widget::EditorWidget;

macro_rules! editor_events {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// One entry of the editor's event taxonomy.
        ///
        /// Variant names equal the native name with the first letter
        /// upper-cased, which is also the handler name minus the "on" prefix.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum EditorEvent {
            $($variant),+
        }

        impl EditorEvent {
            /// Every event, in table order.
            pub const ALL: &'static [EditorEvent] = &[$(EditorEvent::$variant),+];

            /// Name the editor emits the event under.
            pub const fn name(self) -> &'static str {
                match self {
                    $(EditorEvent::$variant => $name),+
                }
            }

            /// Name of the host callback slot for this event.
            pub const fn handler_name(self) -> &'static str {
                match self {
                    $(EditorEvent::$variant => concat!("on", stringify!($variant))),+
                }
            }
        }
    };
}

editor_events! {
    Focusin => "focusin",
    Focusout => "focusout",
    Click => "click",
    Dblclick => "dblclick",
    Mousedown => "mousedown",
    Mouseup => "mouseup",
    Mousemove => "mousemove",
    Mouseover => "mouseover",
    Beforepaste => "beforepaste",
    Paste => "paste",
    Cut => "cut",
    Copy => "copy",
    Selectionchange => "selectionchange",
    Mouseout => "mouseout",
    Mouseenter => "mouseenter",
    Mouseleave => "mouseleave",
    Keydown => "keydown",
    Keypress => "keypress",
    Keyup => "keyup",
    Contextmenu => "contextmenu",
    Dragend => "dragend",
    Dragover => "dragover",
    Draggesture => "draggesture",
    Dragdrop => "dragdrop",
    Drop => "drop",
    Drag => "drag",
    BeforeRenderUI => "BeforeRenderUI",
    SetAttrib => "SetAttrib",
    PreInit => "PreInit",
    PostRender => "PostRender",
    Init => "init",
    Deactivate => "deactivate",
    Activate => "activate",
    NodeChange => "NodeChange",
    BeforeExecCommand => "BeforeExecCommand",
    ExecCommand => "ExecCommand",
    Show => "show",
    Hide => "hide",
    ProgressState => "ProgressState",
    LoadContent => "LoadContent",
    SaveContent => "SaveContent",
    BeforeSetContent => "BeforeSetContent",
    SetContent => "SetContent",
    BeforeGetContent => "BeforeGetContent",
    GetContent => "GetContent",
    VisualAid => "VisualAid",
    Remove => "remove",
    Submit => "submit",
    Reset => "reset",
    BeforeAddUndo => "BeforeAddUndo",
    AddUndo => "AddUndo",
    Change => "change",
    Undo => "undo",
    Redo => "redo",
    ClearUndos => "ClearUndos",
    ObjectSelected => "ObjectSelected",
    ObjectResizeStart => "ObjectResizeStart",
    ObjectResized => "ObjectResized",
    PreProcess => "PreProcess",
    PostProcess => "PostProcess",
    Focus => "focus",
    Blur => "blur",
    Dirty => "dirty",
}

/// Number of entries in the event taxonomy.
pub const EVENT_COUNT: usize = EditorEvent::ALL.len();

impl EditorEvent {
    /// Look up an event by its native name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// Look up an event by its handler slot name (e.g. `onNodeChange`).
    pub fn from_handler_name(handler: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.handler_name() == handler)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host callback for one event: receives the raw event and the instance that
/// emitted it, since native events carry no reference to their editor.
pub type EventHandler<W> = Rc<dyn Fn(&<W as EditorWidget>::Event, &W)>;

/// Host callback slots, one per taxonomy entry.
pub struct EventHandlers<W: EditorWidget> {
    slots: [Option<EventHandler<W>>; EVENT_COUNT],
}

impl<W: EditorWidget> EventHandlers<W> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Bind a callback, returning the updated set.
    pub fn with(
        mut self,
        event: EditorEvent,
        handler: impl Fn(&W::Event, &W) + 'static,
    ) -> Self {
        self.set(event, handler);
        self
    }

    pub fn set(&mut self, event: EditorEvent, handler: impl Fn(&W::Event, &W) + 'static) {
        self.slots[event.slot()] = Some(Rc::new(handler));
    }

    /// Bind by handler name. Returns false if no slot has that name.
    pub fn set_by_name(
        &mut self,
        handler_name: &str,
        handler: impl Fn(&W::Event, &W) + 'static,
    ) -> bool {
        match EditorEvent::from_handler_name(handler_name) {
            Some(event) => {
                self.set(event, handler);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, event: EditorEvent) {
        self.slots[event.slot()] = None;
    }

    pub fn get(&self, event: EditorEvent) -> Option<&EventHandler<W>> {
        self.slots[event.slot()].as_ref()
    }

    pub fn is_bound(&self, event: EditorEvent) -> bool {
        self.slots[event.slot()].is_some()
    }

    /// Events that currently have a callback.
    pub fn bound(&self) -> impl Iterator<Item = EditorEvent> + '_ {
        EditorEvent::ALL
            .iter()
            .copied()
            .filter(|e| self.is_bound(*e))
    }
}

impl<W: EditorWidget> Default for EventHandlers<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: EditorWidget> Clone for EventHandlers<W> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

/// Slot-wise identity comparison: two sets are equal when every slot holds
/// the same callback allocation (or is empty in both).
impl<W: EditorWidget> PartialEq for EventHandlers<W> {
    fn eq(&self, other: &Self) -> bool {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl<W: EditorWidget> fmt::Debug for EventHandlers<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.bound().map(EditorEvent::handler_name))
            .finish()
    }
}

/// Wires every taxonomy entry on a new instance to the host's callback slots.
///
/// Slots are resolved when an event fires, not when it is wired, so replacing
/// handlers on a live embedding takes effect without recreating the editor.
pub struct EventBridge<W: EditorWidget> {
    handlers: Rc<RefCell<EventHandlers<W>>>,
}

impl<W: EditorWidget> EventBridge<W> {
    pub fn new(handlers: EventHandlers<W>) -> Self {
        Self {
            handlers: Rc::new(RefCell::new(handlers)),
        }
    }

    /// Replace the callback slots.
    pub fn set_handlers(&self, handlers: EventHandlers<W>) {
        *self.handlers.borrow_mut() = handlers;
    }

    pub fn handlers(&self) -> EventHandlers<W> {
        self.handlers.borrow().clone()
    }

    /// Register one listener per taxonomy entry on `instance`.
    pub fn wire(&self, instance: &W) {
        for &event in EditorEvent::ALL {
            // Weak so a destroyed instance that is still referenced
            // elsewhere does not keep host callbacks alive.
            let handlers = Rc::downgrade(&self.handlers);
            let owner = instance.clone();
            instance.on(
                event,
                Box::new(move |raw| {
                    let Some(handlers) = handlers.upgrade() else {
                        return;
                    };
                    // Clone out of the table so the callback may swap handlers.
                    let handler = handlers.borrow().get(event).cloned();
                    if let Some(handler) = handler {
                        handler(raw, &owner);
                    }
                }),
            );
        }
        tracing::trace!(events = EVENT_COUNT, "event bridge wired");
    }
}

impl<W: EditorWidget> Clone for EventBridge<W> {
    fn clone(&self) -> Self {
        Self {
            handlers: Rc::clone(&self.handlers),
        }
    }
}
