//! Bindings to the page's `tinymce` global.
//!
//! The runtime script is loaded by the host page; nothing here bundles it.
//! Every call into the global is `catch`ed so a missing or misbehaving
//! runtime surfaces as a [`RegistryError`] instead of a wasm trap.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use tinymce_embed_core::{
    EditorEvent, EditorWidget, Listener, RegistryError, SetupFn, WidgetRegistry,
};

#[wasm_bindgen]
extern "C" {
    /// A TinyMCE `Editor` instance.
    #[derive(Clone, Debug)]
    pub type Editor;

    #[wasm_bindgen(method, getter)]
    pub fn id(this: &Editor) -> String;

    #[wasm_bindgen(method, js_name = getContent)]
    pub fn get_content(this: &Editor) -> String;

    #[wasm_bindgen(method, js_name = setContent)]
    pub fn set_content(this: &Editor, content: &str);

    #[wasm_bindgen(method)]
    pub fn on(this: &Editor, name: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    pub fn off(this: &Editor, name: &str, callback: &js_sys::Function);

    #[wasm_bindgen(catch, js_namespace = tinymce, js_name = init)]
    fn tinymce_init(options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["tinymce", "EditorManager"], js_name = get)]
    fn editor_manager_get(id: &str) -> Result<Option<Editor>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["tinymce", "EditorManager"], js_name = execCommand)]
    fn editor_manager_exec_command(
        command: &str,
        ui: bool,
        value: &str,
    ) -> Result<JsValue, JsValue>;
}

type JsListener = Closure<dyn FnMut(JsValue)>;

/// Listeners registered on one editor, kept so removal can unbind and free them.
#[derive(Debug)]
struct Attached {
    editor: Editor,
    listeners: Vec<(EditorEvent, JsListener)>,
}

type ListenerMap = Rc<RefCell<HashMap<String, Attached>>>;

/// Handle to a live TinyMCE editor.
#[derive(Clone, Debug)]
pub struct BrowserEditor {
    editor: Editor,
    listeners: ListenerMap,
}

impl BrowserEditor {
    pub fn id(&self) -> String {
        self.editor.id()
    }

    /// The underlying JS object, for calling editor APIs not covered here.
    pub fn js(&self) -> &Editor {
        &self.editor
    }
}

impl EditorWidget for BrowserEditor {
    type Event = JsValue;

    fn content(&self) -> String {
        self.editor.get_content()
    }

    fn set_content(&self, content: &str) {
        self.editor.set_content(content);
    }

    fn on(&self, event: EditorEvent, mut listener: Listener<JsValue>) {
        let closure: JsListener =
            Closure::wrap(Box::new(move |evt: JsValue| listener(&evt)) as Box<dyn FnMut(JsValue)>);
        self.editor.on(event.name(), closure.as_ref().unchecked_ref());
        // Held until the registry removes this editor.
        self.listeners
            .borrow_mut()
            .entry(self.editor.id())
            .or_insert_with(|| Attached {
                editor: self.editor.clone(),
                listeners: Vec::new(),
            })
            .listeners
            .push((event, closure));
    }
}

/// The `tinymce.EditorManager` registry.
///
/// Owns the wasm closures behind every listener registered on editors it
/// hands out, and frees them when the editor is removed.
#[derive(Clone, Debug, Default)]
pub struct TinyMceRegistry {
    listeners: ListenerMap,
}

impl TinyMceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tinymce script has been loaded on this page.
    pub fn is_available() -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("tinymce")).unwrap_or(false)
    }

    /// Wrap an editor obtained elsewhere so its listeners are tracked here.
    pub fn editor(&self, editor: Editor) -> BrowserEditor {
        BrowserEditor {
            editor,
            listeners: Rc::clone(&self.listeners),
        }
    }

    /// Listeners currently held for the editor with this id.
    pub fn listener_count(&self, identity: &str) -> usize {
        self.listeners
            .borrow()
            .get(identity)
            .map_or(0, |attached| attached.listeners.len())
    }

    /// Unbind and free every listener registered on `identity`.
    fn release_listeners(&self, identity: &str) {
        // Out of the map first: dropping a listener may drop editor handles.
        let Some(attached) = self.listeners.borrow_mut().remove(identity) else {
            return;
        };
        for (event, closure) in &attached.listeners {
            attached.editor.off(event.name(), closure.as_ref().unchecked_ref());
        }
        tracing::trace!(%identity, count = attached.listeners.len(), "editor listeners released");
    }
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

impl WidgetRegistry for TinyMceRegistry {
    type Widget = BrowserEditor;

    fn init(
        &self,
        options: Map<String, Value>,
        setup: SetupFn<BrowserEditor>,
    ) -> Result<(), RegistryError> {
        if !Self::is_available() {
            return Err(RegistryError::Unavailable);
        }

        // Plain objects rather than ES Maps, which tinymce does not read.
        let js_options = Value::Object(options)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| RegistryError::Runtime(e.to_string()))?;

        let registry = self.clone();
        let setup = Closure::once_into_js(move |editor: Editor| setup(&registry.editor(editor)));
        js_sys::Reflect::set(&js_options, &JsValue::from_str("setup"), &setup)
            .map_err(|e| RegistryError::Runtime(describe(&e)))?;

        tinymce_init(&js_options).map_err(|e| RegistryError::Runtime(describe(&e)))?;
        Ok(())
    }

    fn get(&self, identity: &str) -> Option<BrowserEditor> {
        if !Self::is_available() {
            return None;
        }
        match editor_manager_get(identity) {
            Ok(editor) => editor.map(|editor| self.editor(editor)),
            Err(e) => {
                tracing::debug!(%identity, "EditorManager.get threw: {}", describe(&e));
                None
            }
        }
    }

    fn remove_editor(&self, force: bool, identity: &str) -> Result<(), RegistryError> {
        let result = if !Self::is_available() {
            Err(RegistryError::Unavailable)
        } else if self.get(identity).is_none() {
            // execCommand silently ignores unknown ids, so check first to report it.
            Err(RegistryError::NotFound(identity.into()))
        } else {
            editor_manager_exec_command("mceRemoveEditor", force, identity)
                .map(|_| ())
                .map_err(|e| RegistryError::Runtime(describe(&e)))
        };
        // Whatever the outcome. After the command so remove events still fire.
        self.release_listeners(identity);
        result
    }
}
