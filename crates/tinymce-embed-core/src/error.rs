//! Error types for the embedding bridge.
//!
//! None of these are fatal to the host: registry failures during teardown are
//! logged and swallowed by the lifecycle controller.

use miette::Diagnostic;
use smol_str::SmolStr;

/// Errors reported by the editor runtime's instance registry.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum RegistryError {
    /// No editor is registered under this identity.
    #[error("no editor registered for `{0}`")]
    #[diagnostic(code(tinymce_embed::registry::not_found))]
    NotFound(SmolStr),

    /// An editor is already attached under this identity.
    #[error("an editor is already registered for `{0}`")]
    #[diagnostic(code(tinymce_embed::registry::already_exists))]
    AlreadyExists(SmolStr),

    /// The editor runtime is not loaded on this page.
    #[error("editor runtime is not available")]
    #[diagnostic(
        code(tinymce_embed::registry::unavailable),
        help("load the tinymce script before mounting the editor")
    )]
    Unavailable,

    /// The editor runtime threw while handling the call.
    #[error("editor runtime error: {0}")]
    #[diagnostic(code(tinymce_embed::registry::runtime))]
    Runtime(String),
}

/// Errors building an [`EditorConfig`](crate::EditorConfig) from external input.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// Input was not valid JSON.
    #[error(transparent)]
    #[diagnostic(code(tinymce_embed::config::json))]
    Json(#[from] serde_json::Error),

    /// Editor options must be a JSON object.
    #[error("editor options must be a JSON object")]
    #[diagnostic(code(tinymce_embed::config::not_an_object))]
    NotAnObject,
}
