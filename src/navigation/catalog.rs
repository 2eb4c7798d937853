//! Built-in console catalog: the six console layers and their pages.

use crate::navigation::layer::LayerDescriptor;
use crate::navigation::pages::PageRegistry;

/// Layer and page that `/` redirects to.
pub const ROOT_LAYER: &str = "l2";
pub const ROOT_PAGE: &str = "draft";

const OVERVIEW: &str = "概览";

/// (layer key, layer title, default page, [(subpath, label)])
type LayerRow = (&'static str, &'static str, &'static str, &'static [(&'static str, &'static str)]);

const LAYERS: &[LayerRow] = &[
    (
        "l1",
        "L1 数据接入与治理",
        "overview",
        &[("overview", OVERVIEW), ("data-quality", "数据质量")],
    ),
    (
        "l2",
        "L2 本体/语义选型",
        "draft",
        &[
            ("overview", OVERVIEW),
            ("draft", "草稿图谱（抽取/编辑）"),
            ("formal", "正式图谱（查询/维护）"),
        ],
    ),
    (
        "l3",
        "L3 风险推理/模型",
        "overview",
        &[("overview", OVERVIEW), ("risk-topn", "风险 TopN")],
    ),
    (
        "l4",
        "L4 智能体决策",
        "overview",
        &[("overview", OVERVIEW), ("chat", "对话")],
    ),
    (
        "l5",
        "L5 执行闭环/工作流",
        "overview",
        &[("overview", OVERVIEW), ("tasks", "任务列表")],
    ),
    (
        "l6",
        "L6 战报与追溯",
        "overview",
        &[("overview", OVERVIEW), ("timeline", "时间线")],
    ),
];

fn page_key(layer: &str, subpath: &str) -> String {
    format!("{}.{}", layer, subpath)
}

/// The console's layers, in display order. Every page is listed in the
/// layer's sidebar, in binding order.
pub fn console_layers() -> Vec<LayerDescriptor> {
    LAYERS
        .iter()
        .map(|(key, title, default, pages)| {
            pages.iter().fold(
                LayerDescriptor::new(*key, *title).default_page(*default),
                |layer, (subpath, label)| {
                    let to = layer.page_path(subpath);
                    layer.link(*label, to).page(*subpath, page_key(key, subpath).as_str())
                },
            )
        })
        .collect()
}

/// Registry of every page the built-in catalog binds.
pub fn console_pages() -> PageRegistry {
    let mut registry = PageRegistry::new();
    for (key, _, _, pages) in LAYERS {
        for (subpath, label) in pages.iter() {
            registry.register(page_key(key, subpath).as_str(), *label);
        }
    }
    registry
}
