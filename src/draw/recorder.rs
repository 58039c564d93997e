//! 记录型后端
//!
//! 把每个调用记录成 [`DrawCommand`]，并统计各类 push/pop、begin/end 的深度。
//! 命令行工具用它输出一帧的绘制内容，测试用它检查调用序列和栈平衡。

use super::surface::{AxisKind, DrawSurface, ItemInteraction, SeriesSurface, UiSurface};
use crate::resources::{FontHandle, StyleVar, ThemeCol};
use crate::{Color, Point, Rect, Size};
use serde::Serialize;
use std::collections::HashSet;

/// 一次后端调用
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    BeginWindow { label: String, pos: Option<Point>, size: Size },
    EndWindow,
    BeginGroup { width: f32 },
    EndGroup,
    SameLine { spacing: f32 },
    Text { text: String, color: Option<Color> },
    Button { label: String, size: Size },
    SmallButton { label: String },
    BeginTable { label: String, columns: usize, header_row: bool },
    TableSetupColumn { label: String, width: f32 },
    TableHeadersRow,
    TableNextRow { index: usize },
    TableSetColumn { column: usize },
    EndTable,
    Reserve { size: Size },
    PushClipRect { rect: Rect },
    PopClipRect,
    PushFont { name: String, size: f32 },
    PopFont,
    PushStyleColor { col: ThemeCol, color: Color },
    PopStyleColor { count: usize },
    PushStyleVar { var: StyleVar, value: [f32; 2] },
    PopStyleVar { count: usize },
    Line { p1: Point, p2: Point, color: Color, thickness: f32 },
    Rect { min: Point, max: Point, color: Color, fill: Color, rounding: f32, thickness: f32 },
    Circle { center: Point, radius: f32, color: Color, fill: Color, thickness: f32, segments: u32 },
    Triangle { p1: Point, p2: Point, p3: Point, color: Color, fill: Color, thickness: f32 },
    Quad { points: [Point; 4], color: Color, fill: Color, thickness: f32 },
    BezierCubic { points: [Point; 4], color: Color, thickness: f32, segments: u32 },
    Polyline { points: Vec<Point>, color: Color, closed: bool, thickness: f32 },
    Polygon { points: Vec<Point>, color: Color, fill: Color, thickness: f32 },
    TextAt { pos: Point, text: String, color: Color, size: f32 },
    BeginPlot { label: String, size: Size },
    EndPlot,
    SetupAxis { axis: AxisKind, label: String },
    PlotLine { label: String, xs: Vec<f64>, ys: Vec<f64> },
    PlotScatter { label: String, xs: Vec<f64>, ys: Vec<f64> },
    PlotErrorBars { label: String, xs: Vec<f64>, ys: Vec<f64>, neg: Vec<f64>, pos: Vec<f64> },
    PlotErrorBarsH { label: String, xs: Vec<f64>, ys: Vec<f64>, neg: Vec<f64>, pos: Vec<f64> },
    BeginLegendPopup { label: String },
    EndLegendPopup,
}

impl DrawCommand {
    /// 调用名，与序列化后的 `op` 字段一致
    pub fn op(&self) -> &'static str {
        match self {
            DrawCommand::BeginWindow { .. } => "begin_window",
            DrawCommand::EndWindow => "end_window",
            DrawCommand::BeginGroup { .. } => "begin_group",
            DrawCommand::EndGroup => "end_group",
            DrawCommand::SameLine { .. } => "same_line",
            DrawCommand::Text { .. } => "text",
            DrawCommand::Button { .. } => "button",
            DrawCommand::SmallButton { .. } => "small_button",
            DrawCommand::BeginTable { .. } => "begin_table",
            DrawCommand::TableSetupColumn { .. } => "table_setup_column",
            DrawCommand::TableHeadersRow => "table_headers_row",
            DrawCommand::TableNextRow { .. } => "table_next_row",
            DrawCommand::TableSetColumn { .. } => "table_set_column",
            DrawCommand::EndTable => "end_table",
            DrawCommand::Reserve { .. } => "reserve",
            DrawCommand::PushClipRect { .. } => "push_clip_rect",
            DrawCommand::PopClipRect => "pop_clip_rect",
            DrawCommand::PushFont { .. } => "push_font",
            DrawCommand::PopFont => "pop_font",
            DrawCommand::PushStyleColor { .. } => "push_style_color",
            DrawCommand::PopStyleColor { .. } => "pop_style_color",
            DrawCommand::PushStyleVar { .. } => "push_style_var",
            DrawCommand::PopStyleVar { .. } => "pop_style_var",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Triangle { .. } => "triangle",
            DrawCommand::Quad { .. } => "quad",
            DrawCommand::BezierCubic { .. } => "bezier_cubic",
            DrawCommand::Polyline { .. } => "polyline",
            DrawCommand::Polygon { .. } => "polygon",
            DrawCommand::TextAt { .. } => "text_at",
            DrawCommand::BeginPlot { .. } => "begin_plot",
            DrawCommand::EndPlot => "end_plot",
            DrawCommand::SetupAxis { .. } => "setup_axis",
            DrawCommand::PlotLine { .. } => "plot_line",
            DrawCommand::PlotScatter { .. } => "plot_scatter",
            DrawCommand::PlotErrorBars { .. } => "plot_error_bars",
            DrawCommand::PlotErrorBarsH { .. } => "plot_error_bars_h",
            DrawCommand::BeginLegendPopup { .. } => "begin_legend_popup",
            DrawCommand::EndLegendPopup => "end_legend_popup",
        }
    }
}

/// 各类栈的当前深度，负数表示出现过多余的 pop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StackDepths {
    pub font: i64,
    pub style_color: i64,
    pub style_var: i64,
    pub clip: i64,
    pub window: i64,
    pub group: i64,
    pub plot: i64,
    pub table: i64,
    pub legend: i64,
}

impl StackDepths {
    pub fn is_zero(&self) -> bool {
        *self == StackDepths::default()
    }
}

/// 打开中的分组
#[derive(Debug, Clone)]
struct GroupFrame {
    start: Point,
    min_width: f32,
    right: f32,
    line_x: f32,
    row_bottom: f32,
}

/// 记录型后端
///
/// 带一个简单的布局光标：控件自上而下排列，`same_line` 把下一个控件排到上一个右侧，
/// 文本尺寸按当前压入的字体计算。
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    pub commands: Vec<DrawCommand>,
    pub depths: StackDepths,
    /// 任何时刻出现过负深度
    pub underflow: bool,
    pub cursor: Point,
    /// 没有压入字体时的行高
    pub line_height: f32,
    /// `same_line` 的默认间距
    pub item_spacing: f32,
    /// 按钮文字四周的留白
    pub frame_padding: Size,
    /// 最近放置的控件区域
    pub last_item: Rect,
    pub plot_origin: Point,
    pub window_open: bool,
    pub plot_open: bool,
    pub table_open: bool,
    pub legend_open: bool,
    /// `last_item_state` 的返回值
    pub interaction: ItemInteraction,
    fail_ops: HashSet<&'static str>,
    fonts: Vec<FontHandle>,
    groups: Vec<GroupFrame>,
    line_x: f32,
    row_bottom: f32,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            depths: StackDepths::default(),
            underflow: false,
            cursor: Point::ZERO,
            line_height: 13.0,
            item_spacing: 8.0,
            frame_padding: Size::new(4.0, 3.0),
            last_item: Rect::default(),
            plot_origin: Point::new(40.0, 20.0),
            window_open: true,
            plot_open: true,
            table_open: true,
            legend_open: true,
            interaction: ItemInteraction::default(),
            fail_ops: HashSet::new(),
            fonts: Vec::new(),
            groups: Vec::new(),
            line_x: 0.0,
            row_bottom: 0.0,
        }
    }
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 调用指定名字的操作时 panic，用于注入绘制故障
    pub fn fail_on(&mut self, op: &'static str) {
        self.fail_ops.insert(op);
    }

    /// 清空记录，开始新的一帧
    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = Point::ZERO;
        self.last_item = Rect::default();
        self.fonts.clear();
        self.groups.clear();
        self.line_x = 0.0;
        self.row_bottom = 0.0;
    }

    /// 当前字体下文本占用的尺寸
    pub fn text_size(&self, text: &str) -> Size {
        match self.fonts.last() {
            Some(font) => Size::new(font.measure(text), font.line_height()),
            None => Size::new(
                text.chars().count() as f32 * self.line_height * 0.5,
                self.line_height,
            ),
        }
    }

    /// 在光标处放置控件并换行
    fn place(&mut self, size: Size) {
        let rect = Rect::from_origin_size(self.cursor, size);
        self.last_item = rect;
        if let Some(group) = self.groups.last_mut() {
            group.right = group.right.max(rect.right());
        }
        self.row_bottom = self.row_bottom.max(rect.bottom());
        self.cursor = Point::new(self.line_x, self.row_bottom);
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.commands.iter().map(DrawCommand::op).collect()
    }

    pub fn count(&self, op: &str) -> usize {
        self.commands.iter().filter(|c| c.op() == op).count()
    }

    pub fn find(&self, op: &str) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.op() == op)
    }

    pub fn is_balanced(&self) -> bool {
        self.depths.is_zero() && !self.underflow
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.commands)
    }

    fn record(&mut self, command: DrawCommand) {
        let op = command.op();
        if self.fail_ops.contains(op) {
            panic!("injected failure in {}", op);
        }
        self.commands.push(command);
    }

    fn adjust(&mut self, depth: fn(&mut StackDepths) -> &mut i64, delta: i64) {
        let value = depth(&mut self.depths);
        *value += delta;
        if *value < 0 {
            self.underflow = true;
        }
    }
}

impl UiSurface for FrameRecorder {
    fn begin_window(&mut self, label: &str, pos: Option<Point>, size: Size) -> bool {
        self.record(DrawCommand::BeginWindow { label: label.to_string(), pos, size });
        self.adjust(|d| &mut d.window, 1);
        self.window_open
    }

    fn end_window(&mut self) {
        self.record(DrawCommand::EndWindow);
        self.adjust(|d| &mut d.window, -1);
    }

    fn begin_group(&mut self, width: f32) {
        self.record(DrawCommand::BeginGroup { width });
        self.adjust(|d| &mut d.group, 1);
        self.groups.push(GroupFrame {
            start: self.cursor,
            min_width: width.max(0.0),
            right: self.cursor.x,
            line_x: self.line_x,
            row_bottom: self.row_bottom,
        });
        self.line_x = self.cursor.x;
        self.row_bottom = self.cursor.y;
    }

    fn end_group(&mut self) {
        self.record(DrawCommand::EndGroup);
        self.adjust(|d| &mut d.group, -1);
        // 整个分组作为一个控件放回外层
        if let Some(group) = self.groups.pop() {
            let size = Size::new(
                (group.right - group.start.x).max(group.min_width),
                self.row_bottom - group.start.y,
            );
            self.line_x = group.line_x;
            self.row_bottom = group.row_bottom;
            self.cursor = group.start;
            self.place(size);
        }
    }

    fn same_line(&mut self, spacing: f32) {
        self.record(DrawCommand::SameLine { spacing });
        let spacing = if spacing < 0.0 { self.item_spacing } else { spacing };
        self.cursor = Point::new(self.last_item.right() + spacing, self.last_item.y);
    }

    fn text(&mut self, text: &str, color: Option<Color>) {
        self.record(DrawCommand::Text { text: text.to_string(), color });
        let size = self.text_size(text);
        self.place(size);
    }

    fn button(&mut self, label: &str, size: Size) -> bool {
        self.record(DrawCommand::Button { label: label.to_string(), size });
        let text = self.text_size(label);
        let width = if size.width > 0.0 { size.width } else { text.width + self.frame_padding.width * 2.0 };
        let height = if size.height > 0.0 { size.height } else { text.height + self.frame_padding.height * 2.0 };
        self.place(Size::new(width, height));
        self.interaction.clicked
    }

    fn small_button(&mut self, label: &str) -> bool {
        self.record(DrawCommand::SmallButton { label: label.to_string() });
        let text = self.text_size(label);
        self.place(Size::new(text.width + self.frame_padding.width * 2.0, text.height));
        self.interaction.clicked
    }

    fn begin_table(&mut self, label: &str, columns: usize, header_row: bool) -> bool {
        if !self.table_open {
            return false;
        }
        self.record(DrawCommand::BeginTable { label: label.to_string(), columns, header_row });
        self.adjust(|d| &mut d.table, 1);
        true
    }

    fn table_setup_column(&mut self, label: &str, width: f32) {
        self.record(DrawCommand::TableSetupColumn { label: label.to_string(), width });
    }

    fn table_headers_row(&mut self) {
        self.record(DrawCommand::TableHeadersRow);
    }

    fn table_next_row(&mut self, index: usize) {
        self.record(DrawCommand::TableNextRow { index });
    }

    fn table_set_column(&mut self, column: usize) {
        self.record(DrawCommand::TableSetColumn { column });
    }

    fn end_table(&mut self) {
        self.record(DrawCommand::EndTable);
        self.adjust(|d| &mut d.table, -1);
    }

    fn cursor_pos(&self) -> Point {
        self.cursor
    }

    fn reserve(&mut self, size: Size) {
        self.record(DrawCommand::Reserve { size });
        self.place(size);
    }

    fn push_clip_rect(&mut self, rect: Rect) {
        self.record(DrawCommand::PushClipRect { rect });
        self.adjust(|d| &mut d.clip, 1);
    }

    fn pop_clip_rect(&mut self) {
        self.record(DrawCommand::PopClipRect);
        self.adjust(|d| &mut d.clip, -1);
    }

    fn push_font(&mut self, font: &FontHandle) {
        self.record(DrawCommand::PushFont { name: font.name.clone(), size: font.size });
        self.adjust(|d| &mut d.font, 1);
        self.fonts.push(font.clone());
    }

    fn pop_font(&mut self) {
        self.record(DrawCommand::PopFont);
        self.adjust(|d| &mut d.font, -1);
        self.fonts.pop();
    }

    fn push_style_color(&mut self, col: ThemeCol, color: Color) {
        self.record(DrawCommand::PushStyleColor { col, color });
        self.adjust(|d| &mut d.style_color, 1);
    }

    fn pop_style_color(&mut self, count: usize) {
        self.record(DrawCommand::PopStyleColor { count });
        self.adjust(|d| &mut d.style_color, -(count as i64));
    }

    fn push_style_var(&mut self, var: StyleVar, value: [f32; 2]) {
        self.record(DrawCommand::PushStyleVar { var, value });
        self.adjust(|d| &mut d.style_var, 1);
    }

    fn pop_style_var(&mut self, count: usize) {
        self.record(DrawCommand::PopStyleVar { count });
        self.adjust(|d| &mut d.style_var, -(count as i64));
    }

    fn last_item_state(&self) -> ItemInteraction {
        self.interaction
    }
}

impl DrawSurface for FrameRecorder {
    fn line(&mut self, p1: Point, p2: Point, color: Color, thickness: f32) {
        self.record(DrawCommand::Line { p1, p2, color, thickness });
    }

    fn rect(&mut self, min: Point, max: Point, color: Color, fill: Color, rounding: f32, thickness: f32) {
        self.record(DrawCommand::Rect { min, max, color, fill, rounding, thickness });
    }

    fn circle(&mut self, center: Point, radius: f32, color: Color, fill: Color, thickness: f32, segments: u32) {
        self.record(DrawCommand::Circle { center, radius, color, fill, thickness, segments });
    }

    fn triangle(&mut self, p1: Point, p2: Point, p3: Point, color: Color, fill: Color, thickness: f32) {
        self.record(DrawCommand::Triangle { p1, p2, p3, color, fill, thickness });
    }

    fn quad(&mut self, points: [Point; 4], color: Color, fill: Color, thickness: f32) {
        self.record(DrawCommand::Quad { points, color, fill, thickness });
    }

    fn bezier_cubic(&mut self, points: [Point; 4], color: Color, thickness: f32, segments: u32) {
        self.record(DrawCommand::BezierCubic { points, color, thickness, segments });
    }

    fn polyline(&mut self, points: &[Point], color: Color, closed: bool, thickness: f32) {
        self.record(DrawCommand::Polyline { points: points.to_vec(), color, closed, thickness });
    }

    fn polygon(&mut self, points: &[Point], color: Color, fill: Color, thickness: f32) {
        self.record(DrawCommand::Polygon { points: points.to_vec(), color, fill, thickness });
    }

    fn text_at(&mut self, pos: Point, text: &str, color: Color, size: f32) {
        self.record(DrawCommand::TextAt { pos, text: text.to_string(), color, size });
    }
}

impl SeriesSurface for FrameRecorder {
    fn begin_plot(&mut self, label: &str, size: Size) -> bool {
        if !self.plot_open {
            return false;
        }
        self.record(DrawCommand::BeginPlot { label: label.to_string(), size });
        self.adjust(|d| &mut d.plot, 1);
        true
    }

    fn end_plot(&mut self) {
        self.record(DrawCommand::EndPlot);
        self.adjust(|d| &mut d.plot, -1);
    }

    fn setup_axis(&mut self, axis: AxisKind, label: &str) {
        self.record(DrawCommand::SetupAxis { axis, label: label.to_string() });
    }

    fn plot_pos(&self) -> Point {
        self.plot_origin
    }

    fn plot_line(&mut self, label: &str, xs: &[f64], ys: &[f64]) {
        self.record(DrawCommand::PlotLine { label: label.to_string(), xs: xs.to_vec(), ys: ys.to_vec() });
    }

    fn plot_scatter(&mut self, label: &str, xs: &[f64], ys: &[f64]) {
        self.record(DrawCommand::PlotScatter { label: label.to_string(), xs: xs.to_vec(), ys: ys.to_vec() });
    }

    fn plot_error_bars(&mut self, label: &str, xs: &[f64], ys: &[f64], neg: &[f64], pos: &[f64]) {
        self.record(DrawCommand::PlotErrorBars {
            label: label.to_string(),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            neg: neg.to_vec(),
            pos: pos.to_vec(),
        });
    }

    fn plot_error_bars_h(&mut self, label: &str, xs: &[f64], ys: &[f64], neg: &[f64], pos: &[f64]) {
        self.record(DrawCommand::PlotErrorBarsH {
            label: label.to_string(),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            neg: neg.to_vec(),
            pos: pos.to_vec(),
        });
    }

    fn begin_legend_popup(&mut self, label: &str) -> bool {
        if !self.legend_open {
            return false;
        }
        self.record(DrawCommand::BeginLegendPopup { label: label.to_string() });
        self.adjust(|d| &mut d.legend, 1);
        true
    }

    fn end_legend_popup(&mut self) {
        self.record(DrawCommand::EndLegendPopup);
        self.adjust(|d| &mut d.legend, -1);
    }
}
