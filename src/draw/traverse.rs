//! 每帧绘制遍历
//!
//! 对每个可见节点：压入字体，启用时压入主题，调用类型自身的绘制，
//! 打开子项作用域并递归，最后更新交互状态。上下文在守卫析构时按相反顺序弹出，
//! 单个节点的故障（返回错误或 panic）只跳过它的子树。

use super::context::{ChildPass, ChildScope, ContextScope, RenderContext};
use super::surface::Backend;
use crate::error::DrawFault;
use crate::item::ItemKind;
use crate::items::ItemBehavior;
use crate::tree::ItemTree;
use crate::value::ItemId;
use crate::Point;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// 一帧的统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    /// 执行了绘制的节点数
    pub drawn: usize,
    /// 因隐藏被跳过的节点数（不含其后代）
    pub skipped: usize,
    pub faults: Vec<NodeFault>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFault {
    pub item: ItemId,
    pub kind: ItemKind,
    pub message: String,
}

/// 绘制一帧
pub fn render_frame(tree: &mut ItemTree, backend: &mut dyn Backend) -> FrameStats {
    tree.frame += 1;
    let mut stats = FrameStats {
        frame: tree.frame,
        ..Default::default()
    };

    let mut ctx = RenderContext::new(backend);
    if let Some(font) = tree.resources.default_font().cloned() {
        ctx.push_font(font);
    }
    let roots = tree.roots.clone();
    for root in roots {
        draw_node(tree, root, &mut ctx, Point::ZERO, &mut stats);
    }
    if let Some(payload) = ctx.unwind_entries(0) {
        warn!(panic = %panic_message(payload.as_ref()), "frame context unwind failed");
    }

    debug!(
        frame = stats.frame,
        drawn = stats.drawn,
        skipped = stats.skipped,
        faults = stats.faults.len(),
        "frame rendered"
    );
    stats
}

/// 绘制一个节点，故障在此截住
fn draw_node(
    tree: &mut ItemTree,
    id: ItemId,
    ctx: &mut RenderContext<'_>,
    origin: Point,
    stats: &mut FrameStats,
) {
    let Some(item) = tree.items.get(&id) else {
        return;
    };
    if !item.common.show {
        stats.skipped += 1;
        return;
    }
    let kind = item.kind;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        draw_subtree(tree, id, ctx, origin, stats)
    }));
    let fault = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(fault)) => fault,
        Err(payload) => DrawFault::Panicked(panic_message(payload.as_ref())),
    };
    warn!(item = %id, kind = %kind, fault = %fault, "draw fault contained");
    stats.faults.push(NodeFault {
        item: id,
        kind,
        message: fault.to_string(),
    });
}

fn draw_subtree(
    tree: &mut ItemTree,
    id: ItemId,
    ctx: &mut RenderContext<'_>,
    origin: Point,
    stats: &mut FrameStats,
) -> Result<(), DrawFault> {
    let mut scope = ContextScope::new(ctx);
    let Some(item) = tree.items.get(&id) else {
        return Ok(());
    };

    if let Some(font) = &item.font {
        scope.push_font(font.clone());
    }
    if item.common.enabled {
        // 自身主题优先，其次类型默认主题，最后继承
        let own = item
            .theme
            .clone()
            .or_else(|| tree.resources.kind_theme(item.kind).cloned());
        match own {
            Some(theme) => scope.push_theme(theme, item.kind),
            None => scope.apply_inherited_theme(item.kind),
        }
    }

    stats.drawn += 1;
    let pass = item.data.draw(&item.common, scope.backend(), origin)?;
    let interaction = scope.backend().last_item_state();

    let kind = item.kind;
    let slots = item.children.clone();
    let columns = match kind {
        ItemKind::Table => slots[0]
            .iter()
            .filter(|c| tree.items.get(*c).map_or(false, |col| col.common.show))
            .count(),
        _ => 0,
    };
    let has_children = slots.iter().any(|slot| !slot.is_empty());

    let entered = scope.enter(&pass, columns, has_children);
    if entered.open {
        // 行内单元格不能超出所在表格的列数
        let cells = match kind {
            ItemKind::TableRow => scope.table_columns().unwrap_or(0),
            _ => usize::MAX,
        };
        let mut placed = 0;
        for (index, slot) in slots.iter().enumerate() {
            if kind == ItemKind::Table && index == 1 && pass_has_headers(&pass) {
                scope.backend().table_headers_row();
            }
            for (column, child) in slot.iter().enumerate() {
                if column >= cells {
                    debug!(row = %id, column, columns = cells, "table cell beyond last column skipped");
                    break;
                }
                if kind == ItemKind::TableRow {
                    scope.backend().table_set_column(column);
                }
                if is_shown(tree, *child) {
                    if let (Some(spacing), true) = (entered.same_line, placed > 0) {
                        scope.backend().same_line(spacing);
                    }
                    placed += 1;
                }
                draw_node(tree, *child, &mut scope, entered.origin, stats);
            }
        }
    }

    let frame = tree.frame;
    if let Some(item) = tree.items.get_mut(&id) {
        item.state.record(interaction, frame);
    }
    Ok(())
}

fn is_shown(tree: &ItemTree, id: ItemId) -> bool {
    tree.items.get(&id).map_or(false, |item| item.common.show)
}

fn pass_has_headers(pass: &ChildPass) -> bool {
    matches!(pass.scope, ChildScope::Table { header_row: true, .. })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
