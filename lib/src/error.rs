use oxigraph::model::Term;
use oxigraph::store::{LoaderError, StorageError};
use thiserror::Error;

/// Errors surfaced by the shapes-graph compiler and path engine.
///
/// Store access and graph loading failures pass through from oxigraph
/// unchanged; the only error this crate introduces itself is
/// [`ShaclError::UnsupportedPath`].
#[derive(Error, Debug)]
pub enum ShaclError {
    /// The `sh:path` description matched none of the recognized path forms.
    #[error("Unsupported SHACL path {0}")]
    UnsupportedPath(Term),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Loader(#[from] LoaderError),
}
