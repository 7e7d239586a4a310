//! Dioxus host component.
//!
//! Maps Dioxus lifecycle onto the controller: the first `use_effect` run is
//! the mount, every render of the body is a props-will-change, and `use_drop`
//! is the unmount. The rendered container only changes when the controller
//! recreates the editor, so content-only prop changes leave the DOM alone
//! and the editor keeps its cursor.

use std::rc::Rc;

use dioxus::prelude::*;
use tinymce_embed_core::{BridgeOptions, EditorConfig, EmbedProps, EventHandlers, SmolStr, Surface};

use crate::tinymce::BrowserEditor;
use crate::{BrowserController, ComputedStyleProbe, TimeoutScheduler, TinyMceRegistry};

#[derive(Props, Clone, PartialEq)]
pub struct TinyMceProps {
    /// Editor options passed to `tinymce.init`. Any change recreates the editor.
    #[props(default)]
    pub config: EditorConfig,
    #[props(default, into)]
    pub content: String,
    /// Container id; generated when absent.
    pub id: Option<String>,
    pub class: Option<String>,
    pub name: Option<String>,
    /// Callbacks keyed by editor event, e.g. `onChange`, `onNodeChange`.
    #[props(default)]
    pub handlers: EventHandlers<BrowserEditor>,
    #[props(default)]
    pub options: BridgeOptions,
}

impl TinyMceProps {
    fn embed_props(&self) -> EmbedProps<BrowserEditor> {
        EmbedProps {
            config: self.config.clone(),
            content: self.content.clone(),
            identity: self.id.as_deref().map(SmolStr::new),
            class_name: self.class.clone(),
            name: self.name.clone(),
            handlers: self.handlers.clone(),
            setup: None,
        }
    }
}

/// A TinyMCE editor embedded in the component tree.
#[component]
pub fn TinyMce(props: TinyMceProps) -> Element {
    let embed = props.embed_props();
    let controller = use_hook(|| {
        Rc::new(BrowserController::with_options(
            TinyMceRegistry::new(),
            ComputedStyleProbe,
            TimeoutScheduler,
            embed.clone(),
            props.options.clone(),
        ))
    });

    controller.props_will_change(embed);

    {
        let controller = controller.clone();
        use_effect(move || controller.mount());
    }
    {
        let controller = controller.clone();
        use_drop(move || controller.unmount());
    }

    match controller.surface() {
        Surface::Inline { id, class, html } => rsx! {
            div { id: "{id}", class, dangerous_inner_html: "{html}" }
        },
        Surface::Textarea {
            id,
            class,
            name,
            default_value,
        } => rsx! {
            textarea { id: "{id}", class, name, initial_value: "{default_value}" }
        },
    }
}
