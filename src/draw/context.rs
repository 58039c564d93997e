//! 渲染上下文栈
//!
//! 字体、主题样式与各类 begin/end 作用域都记录在同一个栈上，
//! [`ContextScope`] 在离开作用域时按相反顺序弹出，出错或 panic 时也一样。
//! 某个弹出调用本身 panic 时，其余条目照样弹出，之后再把 panic 抛给外层。

use super::surface::Backend;
use crate::item::ItemKind;
use crate::resources::{FontHandle, ThemeEntries, ThemeHandle};
use crate::{Point, Rect, Size};
use std::any::Any;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

/// 后端在弹出时 panic 的载荷
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// 条目绘制后为子项打开的作用域
#[derive(Debug, Clone, PartialEq)]
pub enum ChildScope {
    /// 不开新作用域
    Inline,
    Window {
        label: String,
        pos: Option<Point>,
        size: Size,
    },
    Group {
        width: f32,
        /// 水平排列时子项之间的间距
        same_line: Option<f32>,
    },
    /// 子项裁剪到矩形内
    Clip(Rect),
    Plot {
        label: String,
        size: Size,
    },
    Table {
        label: String,
        header_row: bool,
    },
    TableRow {
        index: usize,
    },
    LegendPopup {
        label: String,
    },
}

/// 条目绘制结果：子项坐标原点与作用域
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPass {
    pub origin: Point,
    pub scope: ChildScope,
}

impl ChildPass {
    pub fn inline(origin: Point) -> Self {
        Self { origin, scope: ChildScope::Inline }
    }

    pub fn new(origin: Point, scope: ChildScope) -> Self {
        Self { origin, scope }
    }
}

/// 需要在退出时关闭的作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenScope {
    Window,
    Group,
    Clip,
    Plot,
    Table,
    LegendPopup,
}

#[derive(Debug)]
enum Pushed {
    Font,
    Style {
        colors: usize,
        vars: usize,
        fresh: bool,
    },
    Scope(OpenScope),
}

/// 进入作用域的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entered {
    /// 子项是否绘制
    pub open: bool,
    /// 子项原点
    pub origin: Point,
    /// 子项同行排列时的间距
    pub same_line: Option<f32>,
}

pub struct RenderContext<'b> {
    backend: &'b mut dyn Backend,
    entries: Vec<Pushed>,
    fonts: Vec<FontHandle>,
    themes: Vec<ThemeHandle>,
    table_columns: Vec<usize>,
}

impl<'b> RenderContext<'b> {
    pub fn new(backend: &'b mut dyn Backend) -> Self {
        Self {
            backend,
            entries: Vec::new(),
            fonts: Vec::new(),
            themes: Vec::new(),
            table_columns: Vec::new(),
        }
    }

    pub fn backend(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }

    /// 栈深度
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn current_font(&self) -> Option<&FontHandle> {
        self.fonts.last()
    }

    pub fn current_theme(&self) -> Option<&ThemeHandle> {
        self.themes.last()
    }

    /// 最内层已打开表格的列数
    pub fn table_columns(&self) -> Option<usize> {
        self.table_columns.last().copied()
    }

    pub fn push_font(&mut self, font: FontHandle) {
        self.backend.push_font(&font);
        self.fonts.push(font);
        self.entries.push(Pushed::Font);
    }

    /// 压入主题，全部类型组件与匹配类型组件都生效
    pub fn push_theme(&mut self, theme: ThemeHandle, kind: ItemKind) {
        let entries = theme.borrow().entries_for(kind, true);
        self.push_entries(&entries, true);
        self.themes.push(theme);
    }

    /// 继承的主题只补上与本类型匹配的组件
    pub fn apply_inherited_theme(&mut self, kind: ItemKind) {
        let Some(theme) = self.themes.last() else {
            return;
        };
        let entries = theme.borrow().entries_for(kind, false);
        if !entries.is_empty() {
            self.push_entries(&entries, false);
        }
    }

    fn push_entries(&mut self, entries: &ThemeEntries, fresh: bool) {
        for (col, color) in &entries.colors {
            self.backend.push_style_color(*col, *color);
        }
        for (var, value) in &entries.styles {
            self.backend.push_style_var(*var, *value);
        }
        self.entries.push(Pushed::Style {
            colors: entries.colors.len(),
            vars: entries.styles.len(),
            fresh,
        });
    }

    /// 打开子项作用域
    ///
    /// `columns` 只在表格作用域使用，`has_children` 为假时图例弹窗不打开。
    pub fn enter(&mut self, pass: &ChildPass, columns: usize, has_children: bool) -> Entered {
        let closed = Entered { open: false, origin: pass.origin, same_line: None };
        let opened = |origin| Entered { open: true, origin, same_line: None };
        match &pass.scope {
            ChildScope::Inline | ChildScope::TableRow { .. } => {
                if let ChildScope::TableRow { index } = pass.scope {
                    self.backend.table_next_row(index);
                }
                opened(pass.origin)
            }
            ChildScope::Window { label, pos, size } => {
                // 窗口无论是否折叠都要配对 end
                let open = self.backend.begin_window(label, *pos, *size);
                self.entries.push(Pushed::Scope(OpenScope::Window));
                Entered { open, origin: pass.origin, same_line: None }
            }
            ChildScope::Group { width, same_line } => {
                self.backend.begin_group(*width);
                self.entries.push(Pushed::Scope(OpenScope::Group));
                Entered { open: true, origin: pass.origin, same_line: *same_line }
            }
            ChildScope::Clip(rect) => {
                self.backend.push_clip_rect(*rect);
                self.entries.push(Pushed::Scope(OpenScope::Clip));
                opened(pass.origin)
            }
            ChildScope::Plot { label, size } => {
                if !self.backend.begin_plot(label, *size) {
                    return closed;
                }
                self.entries.push(Pushed::Scope(OpenScope::Plot));
                opened(self.backend.plot_pos())
            }
            ChildScope::Table { label, header_row } => {
                // 没有可见列的表格不打开
                if columns == 0 || !self.backend.begin_table(label, columns, *header_row) {
                    return closed;
                }
                self.table_columns.push(columns);
                self.entries.push(Pushed::Scope(OpenScope::Table));
                opened(pass.origin)
            }
            ChildScope::LegendPopup { label } => {
                if !has_children || !self.backend.begin_legend_popup(label) {
                    return closed;
                }
                self.entries.push(Pushed::Scope(OpenScope::LegendPopup));
                opened(self.backend.plot_pos())
            }
        }
    }

    /// 弹出到指定深度，每个后端调用单独截住 panic，返回第一个 panic 的载荷
    pub fn unwind_entries(&mut self, mark: usize) -> Option<PanicPayload> {
        let mut failure = None;
        while self.entries.len() > mark {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            let backend = &mut *self.backend;
            match entry {
                Pushed::Font => {
                    self.fonts.pop();
                    guarded(&mut failure, || backend.pop_font());
                }
                Pushed::Style { colors, vars, fresh } => {
                    if fresh {
                        self.themes.pop();
                    }
                    if colors > 0 {
                        guarded(&mut failure, || backend.pop_style_color(colors));
                    }
                    if vars > 0 {
                        guarded(&mut failure, || backend.pop_style_var(vars));
                    }
                }
                Pushed::Scope(scope) => {
                    if scope == OpenScope::Table {
                        self.table_columns.pop();
                    }
                    guarded(&mut failure, || match scope {
                        OpenScope::Window => backend.end_window(),
                        OpenScope::Group => backend.end_group(),
                        OpenScope::Clip => backend.pop_clip_rect(),
                        OpenScope::Plot => backend.end_plot(),
                        OpenScope::Table => backend.end_table(),
                        OpenScope::LegendPopup => backend.end_legend_popup(),
                    });
                }
            }
        }
        failure
    }
}

fn guarded(failure: &mut Option<PanicPayload>, call: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(call)) {
        failure.get_or_insert(payload);
    }
}

/// 作用域守卫，离开时弹回进入时的深度
pub struct ContextScope<'c, 'b> {
    ctx: &'c mut RenderContext<'b>,
    mark: usize,
}

impl<'c, 'b> ContextScope<'c, 'b> {
    pub fn new(ctx: &'c mut RenderContext<'b>) -> Self {
        let mark = ctx.depth();
        Self { ctx, mark }
    }
}

impl<'b> Deref for ContextScope<'_, 'b> {
    type Target = RenderContext<'b>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for ContextScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for ContextScope<'_, '_> {
    fn drop(&mut self) {
        let failure = self.ctx.unwind_entries(self.mark);
        // 已在展开中时不能再抛出
        if let Some(payload) = failure {
            if !std::thread::panicking() {
                panic::resume_unwind(payload);
            }
        }
    }
}
