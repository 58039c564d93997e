//! 后端能力接口
//!
//! 条目树只通过这三组接口向即时模式后端输出，不持有后端的生命周期。

use crate::resources::{FontHandle, StyleVar, ThemeCol};
use crate::{Color, Point, Rect, Size};
use serde::Serialize;

/// 后端报告的上一个控件的交互状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ItemInteraction {
    pub hovered: bool,
    pub active: bool,
    pub clicked: bool,
    pub rect: Rect,
}

/// 坐标轴方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    X,
    Y,
}

/// 控件、布局与上下文栈
pub trait UiSurface {
    /// 返回 false 表示窗口折叠，内容不绘制
    fn begin_window(&mut self, label: &str, pos: Option<Point>, size: Size) -> bool;
    fn end_window(&mut self);
    /// `width` 大于 0 时为分组的最小宽度
    fn begin_group(&mut self, width: f32);
    fn end_group(&mut self);
    /// 下一个控件排在上一个控件右侧，`spacing` 为负时用后端默认间距
    fn same_line(&mut self, spacing: f32);
    fn text(&mut self, text: &str, color: Option<Color>);
    /// 返回本帧是否被点击
    fn button(&mut self, label: &str, size: Size) -> bool;
    /// 无边距的小按钮
    fn small_button(&mut self, label: &str) -> bool;

    fn begin_table(&mut self, label: &str, columns: usize, header_row: bool) -> bool;
    fn table_setup_column(&mut self, label: &str, width: f32);
    fn table_headers_row(&mut self);
    fn table_next_row(&mut self, index: usize);
    fn table_set_column(&mut self, column: usize);
    fn end_table(&mut self);

    /// 当前布局光标（屏幕坐标）
    fn cursor_pos(&self) -> Point;
    /// 占用一块区域并推进光标
    fn reserve(&mut self, size: Size);
    fn push_clip_rect(&mut self, rect: Rect);
    fn pop_clip_rect(&mut self);

    /// 后端可以保留句柄直到对应的 `pop_font`
    fn push_font(&mut self, font: &FontHandle);
    fn pop_font(&mut self);
    fn push_style_color(&mut self, col: ThemeCol, color: Color);
    fn pop_style_color(&mut self, count: usize);
    fn push_style_var(&mut self, var: StyleVar, value: [f32; 2]);
    fn pop_style_var(&mut self, count: usize);

    fn last_item_state(&self) -> ItemInteraction {
        ItemInteraction::default()
    }
}

/// 绘图图元输出，坐标为屏幕坐标
pub trait DrawSurface {
    fn line(&mut self, p1: Point, p2: Point, color: Color, thickness: f32);
    fn rect(
        &mut self,
        min: Point,
        max: Point,
        color: Color,
        fill: Color,
        rounding: f32,
        thickness: f32,
    );
    fn circle(
        &mut self,
        center: Point,
        radius: f32,
        color: Color,
        fill: Color,
        thickness: f32,
        segments: u32,
    );
    fn triangle(&mut self, p1: Point, p2: Point, p3: Point, color: Color, fill: Color, thickness: f32);
    fn quad(
        &mut self,
        points: [Point; 4],
        color: Color,
        fill: Color,
        thickness: f32,
    );
    fn bezier_cubic(&mut self, points: [Point; 4], color: Color, thickness: f32, segments: u32);
    fn polyline(&mut self, points: &[Point], color: Color, closed: bool, thickness: f32);
    fn polygon(&mut self, points: &[Point], color: Color, fill: Color, thickness: f32);
    fn text_at(&mut self, pos: Point, text: &str, color: Color, size: f32);
}

/// 图表与数据序列输出
pub trait SeriesSurface {
    fn begin_plot(&mut self, label: &str, size: Size) -> bool;
    fn end_plot(&mut self);
    fn setup_axis(&mut self, axis: AxisKind, label: &str);
    /// 绘图区左上角（屏幕坐标）
    fn plot_pos(&self) -> Point;
    fn plot_line(&mut self, label: &str, xs: &[f64], ys: &[f64]);
    fn plot_scatter(&mut self, label: &str, xs: &[f64], ys: &[f64]);
    fn plot_error_bars(&mut self, label: &str, xs: &[f64], ys: &[f64], neg: &[f64], pos: &[f64]);
    fn plot_error_bars_h(&mut self, label: &str, xs: &[f64], ys: &[f64], neg: &[f64], pos: &[f64]);
    fn begin_legend_popup(&mut self, label: &str) -> bool;
    fn end_legend_popup(&mut self);
}

/// 完整后端
pub trait Backend: UiSurface + DrawSurface + SeriesSurface {}

impl<T: UiSurface + DrawSurface + SeriesSurface> Backend for T {}
