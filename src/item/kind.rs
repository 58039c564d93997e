//! 条目类型标签

use serde::Serialize;
use std::fmt;

/// 条目类型，构造时确定，之后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Window,
    Group,
    Text,
    Button,
    Drawlist,
    DrawLayer,
    DrawLine,
    DrawArrow,
    DrawRect,
    DrawCircle,
    DrawTriangle,
    DrawQuad,
    DrawBezierCubic,
    DrawPolyline,
    DrawPolygon,
    DrawText,
    Plot,
    PlotAxis,
    LineSeries,
    ScatterSeries,
    ErrorSeries,
    Table,
    TableColumn,
    TableRow,
}

impl ItemKind {
    pub const ALL: [ItemKind; 24] = [
        ItemKind::Window,
        ItemKind::Group,
        ItemKind::Text,
        ItemKind::Button,
        ItemKind::Drawlist,
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
        ItemKind::Plot,
        ItemKind::PlotAxis,
        ItemKind::LineSeries,
        ItemKind::ScatterSeries,
        ItemKind::ErrorSeries,
        ItemKind::Table,
        ItemKind::TableColumn,
        ItemKind::TableRow,
    ];

    /// 短名，同时是主题组件的目标名
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Window => "window",
            ItemKind::Group => "group",
            ItemKind::Text => "text",
            ItemKind::Button => "button",
            ItemKind::Drawlist => "drawlist",
            ItemKind::DrawLayer => "draw_layer",
            ItemKind::DrawLine => "line",
            ItemKind::DrawArrow => "arrow",
            ItemKind::DrawRect => "rectangle",
            ItemKind::DrawCircle => "circle",
            ItemKind::DrawTriangle => "triangle",
            ItemKind::DrawQuad => "quad",
            ItemKind::DrawBezierCubic => "bezier_cubic",
            ItemKind::DrawPolyline => "polyline",
            ItemKind::DrawPolygon => "polygon",
            ItemKind::DrawText => "draw_text",
            ItemKind::Plot => "plot",
            ItemKind::PlotAxis => "plot_axis",
            ItemKind::LineSeries => "line_series",
            ItemKind::ScatterSeries => "scatter_series",
            ItemKind::ErrorSeries => "error_series",
            ItemKind::Table => "table",
            ItemKind::TableColumn => "table_column",
            ItemKind::TableRow => "table_row",
        }
    }

    /// 错误信息中使用的可读名
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Window => "window",
            ItemKind::Group => "group",
            ItemKind::Text => "text",
            ItemKind::Button => "button",
            ItemKind::Drawlist => "drawlist",
            ItemKind::DrawLayer => "draw layer",
            ItemKind::DrawLine => "draw line",
            ItemKind::DrawArrow => "draw arrow",
            ItemKind::DrawRect => "draw rectangle",
            ItemKind::DrawCircle => "draw circle",
            ItemKind::DrawTriangle => "draw triangle",
            ItemKind::DrawQuad => "draw quad",
            ItemKind::DrawBezierCubic => "draw bezier cubic",
            ItemKind::DrawPolyline => "draw polyline",
            ItemKind::DrawPolygon => "draw polygon",
            ItemKind::DrawText => "draw text",
            ItemKind::Plot => "plot",
            ItemKind::PlotAxis => "plot axis",
            ItemKind::LineSeries => "line series",
            ItemKind::ScatterSeries => "scatter series",
            ItemKind::ErrorSeries => "error series",
            ItemKind::Table => "table",
            ItemKind::TableColumn => "table column",
            ItemKind::TableRow => "table row",
        }
    }

    /// 绘图图元用 `draw_*`，其余用 `add_*`
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            ItemKind::DrawLine
                | ItemKind::DrawArrow
                | ItemKind::DrawRect
                | ItemKind::DrawCircle
                | ItemKind::DrawTriangle
                | ItemKind::DrawQuad
                | ItemKind::DrawBezierCubic
                | ItemKind::DrawPolyline
                | ItemKind::DrawPolygon
                | ItemKind::DrawText
        )
    }

    /// 宿主创建命令名
    pub fn command(&self) -> &'static str {
        match self {
            ItemKind::Window => "add_window",
            ItemKind::Group => "add_group",
            ItemKind::Text => "add_text",
            ItemKind::Button => "add_button",
            ItemKind::Drawlist => "add_drawlist",
            ItemKind::DrawLayer => "add_draw_layer",
            ItemKind::DrawLine => "draw_line",
            ItemKind::DrawArrow => "draw_arrow",
            ItemKind::DrawRect => "draw_rectangle",
            ItemKind::DrawCircle => "draw_circle",
            ItemKind::DrawTriangle => "draw_triangle",
            ItemKind::DrawQuad => "draw_quad",
            ItemKind::DrawBezierCubic => "draw_bezier_cubic",
            ItemKind::DrawPolyline => "draw_polyline",
            ItemKind::DrawPolygon => "draw_polygon",
            ItemKind::DrawText => "draw_text",
            ItemKind::Plot => "add_plot",
            ItemKind::PlotAxis => "add_plot_axis",
            ItemKind::LineSeries => "add_line_series",
            ItemKind::ScatterSeries => "add_scatter_series",
            ItemKind::ErrorSeries => "add_error_series",
            ItemKind::Table => "add_table",
            ItemKind::TableColumn => "add_table_column",
            ItemKind::TableRow => "add_table_row",
        }
    }

    pub fn from_name(name: &str) -> Option<ItemKind> {
        ItemKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn from_command(command: &str) -> Option<ItemKind> {
        ItemKind::ALL.iter().copied().find(|k| k.command() == command)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
