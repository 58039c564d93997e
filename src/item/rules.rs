//! 父子兼容规则表
//!
//! 规则是纯数据：每种类型声明允许的父类型与各子槽接受的子类型。
//! 创建与移动都只查这张表，不依赖绘制逻辑。

use super::kind::ItemKind;

/// 允许出现在普通容器里的控件
pub const WIDGETS: &[ItemKind] = &[
    ItemKind::Group,
    ItemKind::Text,
    ItemKind::Button,
    ItemKind::Drawlist,
    ItemKind::Plot,
    ItemKind::Table,
];

/// 绘图图元
pub const DRAWING: &[ItemKind] = &[
    ItemKind::DrawLine,
    ItemKind::DrawArrow,
    ItemKind::DrawRect,
    ItemKind::DrawCircle,
    ItemKind::DrawTriangle,
    ItemKind::DrawQuad,
    ItemKind::DrawBezierCubic,
    ItemKind::DrawPolyline,
    ItemKind::DrawPolygon,
    ItemKind::DrawText,
];

const DRAWLIST_CHILDREN: &[ItemKind] = &[
    ItemKind::DrawLayer,
    ItemKind::DrawLine,
    ItemKind::DrawArrow,
    ItemKind::DrawRect,
    ItemKind::DrawCircle,
    ItemKind::DrawTriangle,
    ItemKind::DrawQuad,
    ItemKind::DrawBezierCubic,
    ItemKind::DrawPolyline,
    ItemKind::DrawPolygon,
    ItemKind::DrawText,
];

const SERIES: &[ItemKind] = &[
    ItemKind::LineSeries,
    ItemKind::ScatterSeries,
    ItemKind::ErrorSeries,
];

const LEGEND: &[ItemKind] = &[ItemKind::Text, ItemKind::Button, ItemKind::Group];

const DRAWING_PARENTS: &[ItemKind] = &[ItemKind::Drawlist, ItemKind::DrawLayer, ItemKind::Plot];

/// 父类型约束
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentRule {
    /// 只能作为顶层条目
    TopLevel,
    /// 任何有匹配子槽的容器
    Any,
    /// 只能挂在列出的类型下
    Only(&'static [ItemKind]),
}

/// 子槽：名字与接受的子类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSlot {
    pub name: &'static str,
    pub accepts: &'static [ItemKind],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindRules {
    pub parent: ParentRule,
    pub slots: &'static [ChildSlot],
}

const fn slot(name: &'static str, accepts: &'static [ItemKind]) -> ChildSlot {
    ChildSlot { name, accepts }
}

const NO_SLOTS: &[ChildSlot] = &[];
const WIDGET_SLOTS: &[ChildSlot] = &[slot("widgets", WIDGETS)];
const DRAWLIST_SLOTS: &[ChildSlot] = &[slot("drawing", DRAWLIST_CHILDREN)];
const LAYER_SLOTS: &[ChildSlot] = &[slot("drawing", DRAWING)];
const PLOT_SLOTS: &[ChildSlot] = &[slot("axes", &[ItemKind::PlotAxis]), slot("drawing", DRAWING)];
const AXIS_SLOTS: &[ChildSlot] = &[slot("series", SERIES)];
const SERIES_SLOTS: &[ChildSlot] = &[slot("legend", LEGEND)];
const TABLE_SLOTS: &[ChildSlot] = &[
    slot("columns", &[ItemKind::TableColumn]),
    slot("rows", &[ItemKind::TableRow]),
];
const ROW_SLOTS: &[ChildSlot] = &[slot("cells", WIDGETS)];

/// 查询类型规则
pub fn rules_for(kind: ItemKind) -> KindRules {
    use ItemKind::*;
    let (parent, slots) = match kind {
        Window => (ParentRule::TopLevel, WIDGET_SLOTS),
        Group => (ParentRule::Any, WIDGET_SLOTS),
        Text | Button => (ParentRule::Any, NO_SLOTS),
        Drawlist => (ParentRule::Any, DRAWLIST_SLOTS),
        DrawLayer => (ParentRule::Only(&[Drawlist]), LAYER_SLOTS),
        DrawLine | DrawArrow | DrawRect | DrawCircle | DrawTriangle | DrawQuad | DrawBezierCubic
        | DrawPolyline | DrawPolygon | DrawText => (ParentRule::Only(DRAWING_PARENTS), NO_SLOTS),
        Plot => (ParentRule::Any, PLOT_SLOTS),
        PlotAxis => (ParentRule::Only(&[Plot]), AXIS_SLOTS),
        LineSeries | ScatterSeries | ErrorSeries => (ParentRule::Only(&[PlotAxis]), SERIES_SLOTS),
        Table => (ParentRule::Any, TABLE_SLOTS),
        TableColumn => (ParentRule::Only(&[Table]), NO_SLOTS),
        TableRow => (ParentRule::Only(&[Table]), ROW_SLOTS),
    };
    KindRules { parent, slots }
}

/// 子项在父项中的槽位，不接受时返回 None
pub fn slot_for(parent: ItemKind, child: ItemKind) -> Option<usize> {
    let rules = rules_for(child);
    if let ParentRule::Only(parents) = rules.parent {
        if !parents.contains(&parent) {
            return None;
        }
    }
    if rules.parent == ParentRule::TopLevel {
        return None;
    }
    rules_for(parent)
        .slots
        .iter()
        .position(|s| s.accepts.contains(&child))
}

/// 所有可以容纳该类型的父类型
pub fn acceptable_parents(child: ItemKind) -> Vec<ItemKind> {
    ItemKind::ALL
        .iter()
        .copied()
        .filter(|parent| slot_for(*parent, child).is_some())
        .collect()
}

/// 只能作为顶层
pub fn is_root_kind(kind: ItemKind) -> bool {
    rules_for(kind).parent == ParentRule::TopLevel
}

pub fn slot_count(kind: ItemKind) -> usize {
    rules_for(kind).slots.len()
}

pub fn is_container(kind: ItemKind) -> bool {
    slot_count(kind) > 0
}
