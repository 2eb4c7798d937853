//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route tree and the proxy table from validated config
//! - Refuse to start on any structural defect
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Everything is built before a listener is bound (traffic only when ready)

use thiserror::Error;

use crate::config::schema::{ConsoleConfig, NavigationConfig};
use crate::config::validation::validate_config;
use crate::config::ConfigError;
use crate::navigation::catalog;
use crate::navigation::{ConfigurationError, PageRegistry, RouteTree, RouteTreeBuilder};
use crate::proxy::table::{ProxyTable, ProxyTableError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("navigation: {0}")]
    Navigation(#[from] ConfigurationError),

    #[error("proxy: {0}")]
    Proxy(#[from] ProxyTableError),
}

/// Everything the dev server serves, built once.
#[derive(Debug)]
pub struct Console {
    pub config: ConsoleConfig,
    pub tree: RouteTree,
    pub pages: PageRegistry,
    pub proxy: ProxyTable,
}

/// Validate `config` and build the console from it.
pub fn prepare(config: ConsoleConfig) -> Result<Console, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let tree = build_tree(&config.navigation)?;
    let pages = page_registry(&config.navigation);
    let proxy = ProxyTable::from_config(&config.proxy)?;

    tracing::info!(
        layers = config.navigation.layers.len(),
        pages = pages.len(),
        proxy_rules = proxy.rules().len(),
        root = %format!("/{}/{}", config.navigation.root.layer, config.navigation.root.page),
        "Console prepared"
    );
    for rule in proxy.rules() {
        tracing::info!(
            rule = %rule.name,
            prefix = %rule.prefix,
            fallback = %rule.target.fallback(),
            env = rule.target.env_var().unwrap_or("-"),
            "Proxy rule registered"
        );
    }

    Ok(Console {
        config,
        tree,
        pages,
        proxy,
    })
}

pub fn build_tree(navigation: &NavigationConfig) -> Result<RouteTree, ConfigurationError> {
    RouteTreeBuilder::new()
        .layers(navigation.layers.iter().cloned())
        .root_redirect(navigation.root.layer.clone(), navigation.root.page.clone())
        .strict_sidebar(navigation.strict_sidebar)
        .build()
}

/// Catalog titles, plus sidebar labels for pages the catalog does not know.
fn page_registry(navigation: &NavigationConfig) -> PageRegistry {
    let mut registry = catalog::console_pages();
    for layer in &navigation.layers {
        for binding in &layer.pages {
            if registry.contains(&binding.page) {
                continue;
            }
            let target = layer.page_path(&binding.path);
            let title = layer
                .sidebar
                .iter()
                .find(|e| e.to == target)
                .map(|e| e.label.clone())
                .unwrap_or_else(|| binding.path.clone());
            registry.register(binding.page.clone(), title);
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::LayerDescriptor;

    #[test]
    fn test_prepare_stock_console() {
        let console = prepare(ConsoleConfig::default()).unwrap();
        assert_eq!(console.tree.layers().count(), 6);
        assert_eq!(console.proxy.rules().len(), 2);
        assert_eq!(console.pages.title_of(&"l4.chat".into()), "对话");
    }

    #[test]
    fn test_structural_defect_aborts() {
        let mut config = ConsoleConfig::default();
        config.navigation.layers.push(config.navigation.layers[0].clone());
        let err = prepare(config).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Navigation(ConfigurationError::DuplicateLayer { ref key }) if key == "l1"
        ));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let mut config = ConsoleConfig::default();
        config.timeouts.forward_secs = 0;
        assert!(matches!(
            prepare(config),
            Err(StartupError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn test_custom_pages_are_labelled_from_sidebar() {
        let mut config = ConsoleConfig::default();
        config.navigation.layers = vec![LayerDescriptor::new("ops", "Operations")
            .link("Board", "/ops/board")
            .page("board", "ops.board")
            .page("raw", "ops.raw")
            .default_page("board")];
        config.navigation.root.layer = "ops".into();
        config.navigation.root.page = "board".into();

        let console = prepare(config).unwrap();
        assert_eq!(console.pages.title_of(&"ops.board".into()), "Board");
        assert_eq!(console.pages.title_of(&"ops.raw".into()), "raw");
    }
}
