//! Build-time navigation errors.

use thiserror::Error;

/// Structural defect in the layer descriptors, detected while building
/// the route tree. Always fatal to startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate layer key '{key}'")]
    DuplicateLayer { key: String },

    #[error("layer '{layer}': duplicate subpath '{path}'")]
    DuplicateSubpath { layer: String, path: String },

    #[error("layer '{layer}': default subpath '{default}' is not bound to any page")]
    MissingDefault { layer: String, default: String },

    #[error("layer '{layer}': invalid path segment '{segment}'")]
    InvalidSegment { layer: String, segment: String },

    #[error("layer '{layer}': sidebar entry '{label}' links to unknown route '{to}'")]
    DanglingSidebarLink {
        layer: String,
        label: String,
        to: String,
    },

    #[error("layer '{layer}': subpath '{path}' binds unregistered page '{page}'")]
    UnknownPage {
        layer: String,
        path: String,
        page: String,
    },

    #[error("root redirect targets unknown route '/{layer}/{page}'")]
    UnknownRootTarget { layer: String, page: String },

    #[error("no root redirect configured")]
    MissingRootRedirect,
}
