//! 单元测试模块
//! 覆盖参数编解码、兼容规则、条目树操作、绘制遍历、资源与宿主调用

pub mod codec_tests;
pub mod host_tests;
pub mod tree_tests;

use crate::tree::ItemTree;
use crate::value::{AttrBundle, ItemId};
use crate::ItemKind;

/// 用参数包创建条目，测试里失败直接 panic
pub(crate) fn add(tree: &mut ItemTree, kind: ItemKind, bundle: AttrBundle) -> ItemId {
    tree.create(kind, None, None, &bundle)
        .unwrap_or_else(|e| panic!("create {} failed: {}", kind, e))
}

/// 窗口 > 图表 > y 轴，返回 (窗口, 图表, 轴)
pub(crate) fn plot_scaffold(tree: &mut ItemTree) -> (ItemId, ItemId, ItemId) {
    let window = add(tree, ItemKind::Window, AttrBundle::new().kwarg("label", "main"));
    let plot = add(tree, ItemKind::Plot, AttrBundle::new().kwarg("parent", window).kwarg("label", "plot"));
    let axis = add(tree, ItemKind::PlotAxis, AttrBundle::new().arg("y").kwarg("parent", plot));
    (window, plot, axis)
}
