//! Failure taxonomy for interface materialization.
//!
//! Structural violations abort the whole build; every variant carries
//! the offending element's name and type so the error message alone
//! identifies the bad node in the layout data.

use thiserror::Error;

use crate::element::ElementKind;
use crate::toolkit::ToolkitError;

/// Unrecoverable build failures.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("element `{name}` declares unknown type `{type_tag}`")]
    UnknownElementType { name: String, type_tag: String },

    #[error("element `{name}` ({kind}) cannot be attached under a {parent} parent")]
    IllegalParent {
        name: String,
        kind: ElementKind,
        /// Parent type tag, or "top level" for a root element.
        parent: String,
    },

    #[error("container `{name}` ({kind}) cannot hold child `{child}` ({child_kind})")]
    IllegalChild {
        name: String,
        kind: ElementKind,
        child: String,
        child_kind: ElementKind,
    },

    #[error("leaf element `{name}` ({kind}) carries {count} children")]
    UnexpectedChildren {
        name: String,
        kind: ElementKind,
        count: usize,
    },

    #[error("duplicate element name `{name}` ({kind})")]
    DuplicateName { name: String, kind: ElementKind },

    #[error("element `{name}` ({kind}) declares non-integer column `{value}`")]
    InvalidColumn {
        name: String,
        kind: ElementKind,
        value: String,
    },

    #[error("toolkit failed on `{name}` ({kind}): {source}")]
    Toolkit {
        name: String,
        kind: ElementKind,
        #[source]
        source: ToolkitError,
    },
}

/// Failures from post-build interface manipulation.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("no widget registered under name `{0}`")]
    UnknownName(String),

    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}
