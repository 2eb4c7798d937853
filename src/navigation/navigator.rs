//! Navigation sequencing.
//!
//! Navigations run on a single event loop, but page loads may finish out
//! of order (back/forward while a page is still loading). Every
//! navigation gets a ticket with a monotonically increasing sequence
//! number, and only the latest ticket issued may commit.

use crate::navigation::pages::PageKey;
use crate::navigation::shell::{NavigationShell, ShellView};
use crate::navigation::tree::{Resolution, RouteTree};
use crate::observability::metrics;

/// Handle for one in-flight navigation.
#[derive(Debug, PartialEq, Eq)]
pub struct NavigationTicket {
    seq: u64,
    path: String,
}

impl NavigationTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// State the shell currently reflects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedNavigation {
    pub seq: u64,
    /// Canonical path after redirects.
    pub path: String,
    pub layer_key: Option<String>,
    /// `None` when the navigation missed.
    pub page: Option<PageKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Committed(CommittedNavigation),
    /// A newer navigation was issued; nothing changed.
    Superseded { seq: u64, latest: u64 },
}

#[derive(Debug, Default)]
pub struct Navigator {
    issued: u64,
    current: Option<CommittedNavigation>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start navigating to `path`.
    pub fn begin(&mut self, path: impl Into<String>) -> NavigationTicket {
        self.issued += 1;
        let ticket = NavigationTicket {
            seq: self.issued,
            path: path.into(),
        };
        tracing::trace!(seq = ticket.seq, path = %ticket.path, "Navigation started");
        ticket
    }

    /// Abandon an in-flight navigation.
    pub fn cancel(&mut self, ticket: NavigationTicket) {
        tracing::debug!(seq = ticket.seq, path = %ticket.path, "Navigation cancelled");
        metrics::record_navigation("cancelled");
    }

    /// Finish a navigation: resolve it and, unless superseded, render it.
    pub fn complete<S: NavigationShell + ?Sized>(
        &mut self,
        ticket: NavigationTicket,
        tree: &RouteTree,
        shell: &mut S,
    ) -> NavigationOutcome {
        if ticket.seq != self.issued {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                path = %ticket.path,
                "Discarding superseded navigation"
            );
            metrics::record_navigation("superseded");
            return NavigationOutcome::Superseded {
                seq: ticket.seq,
                latest: self.issued,
            };
        }

        let resolution = tree.resolve(&ticket.path);
        shell.render(&ShellView::from_resolution(&resolution));

        let committed = match &resolution {
            Resolution::Page {
                path, page, meta, ..
            } => {
                metrics::record_navigation("page");
                CommittedNavigation {
                    seq: ticket.seq,
                    path: path.clone(),
                    layer_key: meta.map(|m| m.layer_key.clone()),
                    page: Some((*page).clone()),
                }
            }
            Resolution::NavigationMiss { path } => {
                tracing::info!(path = %path, "Navigation miss");
                metrics::record_navigation("miss");
                CommittedNavigation {
                    seq: ticket.seq,
                    path: path.clone(),
                    layer_key: None,
                    page: None,
                }
            }
        };

        self.current = Some(committed.clone());
        NavigationOutcome::Committed(committed)
    }

    /// Convenience for synchronous navigations.
    pub fn navigate<S: NavigationShell + ?Sized>(
        &mut self,
        path: impl Into<String>,
        tree: &RouteTree,
        shell: &mut S,
    ) -> NavigationOutcome {
        let ticket = self.begin(path);
        self.complete(ticket, tree, shell)
    }

    pub fn current(&self) -> Option<&CommittedNavigation> {
        self.current.as_ref()
    }
}
