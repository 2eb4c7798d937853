//! Route tree composition.
//!
//! # Responsibilities
//! - Validate layer descriptors (unique keys, unique subpaths, defaults)
//! - Wrap every layer under one shell root
//! - Attach layer metadata once, at the layer's subtree root
//! - Inject the per-layer default redirect and the global root redirect
//!
//! # Design Decisions
//! - All checks run before any node is created, so a failed build
//!   never yields a partial tree
//! - Input order of layers and bindings is preserved verbatim

use std::collections::HashSet;

use crate::navigation::error::ConfigurationError;
use crate::navigation::layer::LayerDescriptor;
use crate::navigation::pages::PageRegistry;
use crate::navigation::tree::{Component, LayerMeta, RouteNode, RouteTree};

/// Builds a [`RouteTree`] from an ordered list of layers.
#[derive(Debug, Clone)]
pub struct RouteTreeBuilder<'r> {
    layers: Vec<LayerDescriptor>,
    root: Option<(String, String)>,
    strict_sidebar: bool,
    registry: Option<&'r PageRegistry>,
}

impl Default for RouteTreeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> RouteTreeBuilder<'r> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            root: None,
            strict_sidebar: true,
            registry: None,
        }
    }

    pub fn layer(mut self, layer: LayerDescriptor) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(mut self, layers: impl IntoIterator<Item = LayerDescriptor>) -> Self {
        self.layers.extend(layers);
        self
    }

    /// Where `/` sends the user.
    pub fn root_redirect(mut self, layer: impl Into<String>, page: impl Into<String>) -> Self {
        self.root = Some((layer.into(), page.into()));
        self
    }

    /// When false, dangling sidebar links are logged instead of rejected.
    pub fn strict_sidebar(mut self, strict: bool) -> Self {
        self.strict_sidebar = strict;
        self
    }

    /// Require every binding to name a registered page.
    pub fn registry(mut self, registry: &'r PageRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validate and compose the tree.
    pub fn build(&self) -> Result<RouteTree, ConfigurationError> {
        self.validate()?;

        let (root_layer, root_page) = self
            .root
            .as_ref()
            .ok_or(ConfigurationError::MissingRootRedirect)?;

        let mut shell = RouteNode::new("/", Component::Shell);
        shell.children = self.layers.iter().map(layer_subtree).collect();

        let root_redirect = RouteNode::new(
            "/",
            Component::Redirect(format!("/{}/{}", root_layer, root_page)),
        );

        tracing::debug!(
            layers = self.layers.len(),
            root = %format!("/{}/{}", root_layer, root_page),
            "Route tree built"
        );

        Ok(RouteTree {
            routes: vec![root_redirect, shell],
        })
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let mut keys = HashSet::new();
        for layer in &self.layers {
            check_segment(&layer.key, &layer.key)?;
            if !keys.insert(layer.key.as_str()) {
                return Err(ConfigurationError::DuplicateLayer {
                    key: layer.key.clone(),
                });
            }

            let mut subpaths = HashSet::new();
            for binding in &layer.pages {
                check_segment(&layer.key, &binding.path)?;
                if !subpaths.insert(binding.path.as_str()) {
                    return Err(ConfigurationError::DuplicateSubpath {
                        layer: layer.key.clone(),
                        path: binding.path.clone(),
                    });
                }
                if let Some(registry) = self.registry {
                    if !registry.contains(&binding.page) {
                        return Err(ConfigurationError::UnknownPage {
                            layer: layer.key.clone(),
                            path: binding.path.clone(),
                            page: binding.page.to_string(),
                        });
                    }
                }
            }

            if layer.binding(&layer.default_page).is_none() {
                return Err(ConfigurationError::MissingDefault {
                    layer: layer.key.clone(),
                    default: layer.default_page.clone(),
                });
            }
        }

        if let Some((root_layer, root_page)) = &self.root {
            if self.find_page(root_layer, root_page).is_none() {
                return Err(ConfigurationError::UnknownRootTarget {
                    layer: root_layer.clone(),
                    page: root_page.clone(),
                });
            }
        }

        self.validate_sidebars()
    }

    fn validate_sidebars(&self) -> Result<(), ConfigurationError> {
        for layer in &self.layers {
            for entry in &layer.sidebar {
                if self.resolves(&entry.to) {
                    continue;
                }
                if self.strict_sidebar {
                    return Err(ConfigurationError::DanglingSidebarLink {
                        layer: layer.key.clone(),
                        label: entry.label.clone(),
                        to: entry.to.clone(),
                    });
                }
                tracing::warn!(
                    layer = %layer.key,
                    label = %entry.label,
                    to = %entry.to,
                    "Sidebar entry links to an unknown route"
                );
            }
        }
        Ok(())
    }

    /// Whether an absolute path names a bound page or a layer root.
    fn resolves(&self, to: &str) -> bool {
        let trimmed = to.trim_matches('/');
        match trimmed.split_once('/') {
            Some((layer, page)) => self.find_page(layer, page).is_some(),
            None => self.layers.iter().any(|l| l.key == trimmed),
        }
    }

    fn find_page(&self, layer: &str, page: &str) -> Option<&LayerDescriptor> {
        self.layers
            .iter()
            .find(|l| l.key == layer)
            .filter(|l| l.binding(page).is_some())
    }
}

/// Segments are served verbatim, so only unreserved URL characters are
/// accepted (`A-Z a-z 0-9 - . _ ~`), and never `.` or `..`.
fn check_segment(layer: &str, segment: &str) -> Result<(), ConfigurationError> {
    let unreserved = segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'));
    if segment.is_empty() || !unreserved || segment == "." || segment == ".." {
        return Err(ConfigurationError::InvalidSegment {
            layer: layer.to_string(),
            segment: segment.to_string(),
        });
    }
    Ok(())
}

fn layer_subtree(layer: &LayerDescriptor) -> RouteNode {
    let mut root = RouteNode::new(layer.root_path(), Component::LayerOutlet);
    root.meta = Some(LayerMeta {
        layer_key: layer.key.clone(),
        layer_title: layer.title.clone(),
        sidebar: layer.sidebar.clone(),
    });

    root.children = layer
        .pages
        .iter()
        .map(|b| RouteNode::new(layer.page_path(&b.path), Component::Page(b.page.clone())))
        .collect();
    root.children.push(RouteNode::new(
        layer.root_path(),
        Component::Redirect(layer.page_path(&layer.default_page)),
    ));
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::pages::PageKey;
    use crate::navigation::tree::Resolution;

    fn ingest() -> LayerDescriptor {
        LayerDescriptor::new("ingest", "Ingestion")
            .link("Overview", "/ingest/overview")
            .link("Quality", "/ingest/quality")
            .page("overview", "ingest.overview")
            .page("quality", "ingest.quality")
            .default_page("overview")
    }

    fn semantics() -> LayerDescriptor {
        LayerDescriptor::new("semantics", "Semantics")
            .link("Draft", "/semantics/draft")
            .link("Formal", "/semantics/formal")
            .page("draft", "semantics.draft")
            .page("formal", "semantics.formal")
            .default_page("formal")
    }

    fn builder<'r>() -> RouteTreeBuilder<'r> {
        RouteTreeBuilder::new()
            .layer(ingest())
            .layer(semantics())
            .root_redirect("semantics", "draft")
    }

    #[test]
    fn test_one_meta_and_one_default_redirect_per_layer() {
        let tree = builder().build().unwrap();
        let shell = &tree.routes()[1];
        assert_eq!(shell.component, Component::Shell);
        assert_eq!(shell.children.len(), 2);

        for layer_root in &shell.children {
            assert!(layer_root.meta.is_some());
            let redirects: Vec<_> = layer_root
                .children
                .iter()
                .filter(|c| c.redirect_target().is_some())
                .collect();
            assert_eq!(redirects.len(), 1);
            assert_eq!(redirects[0].path, layer_root.path);
            // Pages never carry a copy of the metadata
            assert!(layer_root.children.iter().all(|c| c.meta.is_none()));
        }
        assert_eq!(tree.layers().count(), 2);
    }

    #[test]
    fn test_children_preserve_binding_order() {
        let tree = builder().build().unwrap();
        let paths: Vec<_> = tree.routes()[1].children[0]
            .children
            .iter()
            .map(|c| c.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/ingest/overview", "/ingest/quality", "/ingest"]);
    }

    #[test]
    fn test_bare_layer_resolves_to_default() {
        let tree = builder().build().unwrap();
        match tree.resolve("/semantics") {
            Resolution::Page {
                path,
                page,
                redirected_from,
                meta,
            } => {
                assert_eq!(path, "/semantics/formal");
                assert_eq!(page, &PageKey::from("semantics.formal"));
                assert_eq!(redirected_from.as_deref(), Some("/semantics"));
                assert_eq!(meta.map(|m| m.layer_key.as_str()), Some("semantics"));
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_root_redirect_is_independent_of_layer_defaults() {
        let tree = builder().build().unwrap();
        match tree.resolve("/") {
            Resolution::Page { path, .. } => assert_eq!(path, "/semantics/draft"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_path_is_a_miss() {
        let tree = builder().build().unwrap();
        assert!(tree.resolve("/nowhere").is_miss());
        assert!(tree.resolve("/ingest/missing").is_miss());
        assert!(tree.resolve("/ingestx/overview").is_miss());
    }

    #[test]
    fn test_duplicate_layer_key() {
        let err = builder().layer(ingest()).build().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateLayer {
                key: "ingest".into()
            }
        );
    }

    #[test]
    fn test_duplicate_subpath() {
        let layer = ingest().page("overview", "ingest.other");
        let err = RouteTreeBuilder::new()
            .layer(layer)
            .root_redirect("ingest", "overview")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateSubpath { ref layer, ref path }
            if layer == "ingest" && path == "overview"));
    }

    #[test]
    fn test_dangling_default() {
        let err = RouteTreeBuilder::new()
            .layer(ingest().default_page("missing"))
            .root_redirect("ingest", "overview")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingDefault { .. }));
        assert!(err.to_string().contains("ingest"));
    }

    #[test]
    fn test_dangling_sidebar_link() {
        let layer = ingest().link("Ghost", "/ingest/ghost");
        let strict = RouteTreeBuilder::new()
            .layer(layer.clone())
            .root_redirect("ingest", "overview")
            .build();
        assert!(matches!(
            strict,
            Err(ConfigurationError::DanglingSidebarLink { .. })
        ));

        let relaxed = RouteTreeBuilder::new()
            .layer(layer)
            .root_redirect("ingest", "overview")
            .strict_sidebar(false)
            .build();
        assert!(relaxed.is_ok());
    }

    #[test]
    fn test_sidebar_may_link_across_layers() {
        let layer = ingest().link("Go formal", "/semantics/formal");
        let tree = RouteTreeBuilder::new()
            .layer(layer)
            .layer(semantics())
            .root_redirect("ingest", "overview")
            .build();
        assert!(tree.is_ok());
    }

    #[test]
    fn test_root_redirect_required_and_checked() {
        let missing = RouteTreeBuilder::new().layer(ingest()).build();
        assert_eq!(missing, Err(ConfigurationError::MissingRootRedirect));

        let unknown = RouteTreeBuilder::new()
            .layer(ingest())
            .root_redirect("ingest", "nope")
            .build();
        assert!(matches!(
            unknown,
            Err(ConfigurationError::UnknownRootTarget { .. })
        ));
    }

    #[test]
    fn test_invalid_segment() {
        let err = RouteTreeBuilder::new()
            .layer(ingest().page("a/b", "ingest.ab"))
            .root_redirect("ingest", "overview")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidSegment { .. }));
    }

    #[test]
    fn test_segments_must_be_url_safe() {
        for segment in ["概览", "two words", "a?b", "a#b", "50%", "..", "."] {
            let err = RouteTreeBuilder::new()
                .layer(ingest().page(segment, "ingest.odd"))
                .root_redirect("ingest", "overview")
                .build()
                .unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::InvalidSegment {
                    layer: "ingest".into(),
                    segment: segment.into(),
                },
                "{segment}"
            );
        }

        let err = RouteTreeBuilder::new()
            .layer(LayerDescriptor::new("运维", "Ops").page("board", "ops.board").default_page("board"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidSegment { ref layer, .. } if layer == "运维"));

        let ok = RouteTreeBuilder::new()
            .layer(ingest().page("risk-top_n.v2~x", "ingest.risk"))
            .root_redirect("ingest", "overview")
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_registry_checks_bindings() {
        let mut registry = PageRegistry::new();
        registry.register("ingest.overview", "Overview");

        let err = builder().registry(&registry).build().unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownPage { ref page, .. }
            if page == "ingest.quality"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let b = builder();
        assert_eq!(b.build().unwrap(), b.build().unwrap());
    }
}
