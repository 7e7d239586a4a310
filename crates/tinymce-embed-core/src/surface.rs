//! The container element an embedding renders for the editor to attach to.

use smol_str::SmolStr;

use crate::config::EditorConfig;

/// Host-side markup for one embedding.
///
/// Content is only ever the *initial* value here. Once the editor attaches it
/// owns what is displayed, so the surface is rebuilt only when the editor is
/// recreated, never on content-only updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Inline editing on a `div`, content injected as initial markup.
    Inline {
        id: SmolStr,
        class: Option<String>,
        html: String,
    },
    /// Classic mode: the editor replaces a `textarea`.
    Textarea {
        id: SmolStr,
        class: Option<String>,
        name: Option<String>,
        default_value: String,
    },
}

impl Surface {
    pub fn build(
        id: &SmolStr,
        config: &EditorConfig,
        content: &str,
        class: Option<&str>,
        name: Option<&str>,
    ) -> Self {
        if config.is_inline() {
            Surface::Inline {
                id: id.clone(),
                class: class.map(str::to_owned),
                html: content.to_owned(),
            }
        } else {
            Surface::Textarea {
                id: id.clone(),
                class: class.map(str::to_owned),
                name: name.map(str::to_owned),
                default_value: content.to_owned(),
            }
        }
    }

    /// Element id, equal to the embedding identity.
    pub fn id(&self) -> &SmolStr {
        match self {
            Surface::Inline { id, .. } | Surface::Textarea { id, .. } => id,
        }
    }
}
