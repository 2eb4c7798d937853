//! Navigation shell contract.
//!
//! The shell draws the console chrome (layer title, sidebar) around a
//! generic outlet. Everything layer-specific arrives through
//! [`LayerMeta`]; a shell must not branch on layer or page names.

use std::fmt::Write as _;

use crate::navigation::pages::{PageKey, PageRegistry};
use crate::navigation::tree::{LayerMeta, Resolution};

/// What the outlet shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlet<'a> {
    Page(&'a PageKey),
    NotFound,
}

/// Everything a shell needs to draw one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellView<'a> {
    /// Path currently displayed.
    pub path: &'a str,
    /// Metadata of the active layer; `None` outside any layer.
    pub meta: Option<&'a LayerMeta>,
    pub outlet: Outlet<'a>,
}

impl<'a> ShellView<'a> {
    pub fn from_resolution(resolution: &'a Resolution<'a>) -> Self {
        match resolution {
            Resolution::Page {
                path, page, meta, ..
            } => Self {
                path,
                meta: *meta,
                outlet: Outlet::Page(*page),
            },
            Resolution::NavigationMiss { path } => Self {
                path,
                meta: None,
                outlet: Outlet::NotFound,
            },
        }
    }
}

/// Consumer of per-navigation metadata.
pub trait NavigationShell {
    fn render(&mut self, view: &ShellView<'_>);
}

/// Minimal HTML rendering of the shell, served by the dev origin.
#[derive(Debug, Clone)]
pub struct HtmlShell<'p> {
    pages: &'p PageRegistry,
    document: String,
}

impl<'p> HtmlShell<'p> {
    pub fn new(pages: &'p PageRegistry) -> Self {
        Self {
            pages,
            document: String::new(),
        }
    }

    /// The most recently rendered document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl NavigationShell for HtmlShell<'_> {
    fn render(&mut self, view: &ShellView<'_>) {
        let title = view.meta.map(|m| m.layer_title.as_str()).unwrap_or("Console");
        let mut html = String::new();

        let _ = write!(
            html,
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
            escape(title)
        );
        let _ = write!(html, "<header><h1>{}</h1></header>", escape(title));

        if let Some(meta) = view.meta {
            let _ = write!(
                html,
                "<nav class=\"sidebar\" data-layer=\"{}\"><ul>",
                escape(&meta.layer_key)
            );
            for entry in &meta.sidebar {
                let class = if entry.to == view.path { " class=\"active\"" } else { "" };
                let _ = write!(
                    html,
                    "<li><a href=\"{}\"{}>{}</a></li>",
                    escape(&entry.to),
                    class,
                    escape(&entry.label)
                );
            }
            html.push_str("</ul></nav>");
        }

        match view.outlet {
            Outlet::Page(page) => {
                let _ = write!(
                    html,
                    "<main data-page=\"{}\"><h2>{}</h2></main>",
                    escape(page.as_str()),
                    escape(self.pages.title_of(page))
                );
            }
            Outlet::NotFound => {
                let _ = write!(
                    html,
                    "<main data-page=\"not-found\"><h2>Not found</h2><p>{}</p></main>",
                    escape(view.path)
                );
            }
        }

        html.push_str("</body></html>");
        self.document = html;
    }
}

fn escape(raw: &str) -> String {
    v_htmlescape::escape(raw).to_string()
}
