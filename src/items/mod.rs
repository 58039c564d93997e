//! 具体条目类型
//!
//! 每种类型一个数据结构，实现 [`ItemBehavior`]；[`ItemData`] 按类型标签分发。

pub mod base;
pub mod drawlist;
pub mod group;
pub mod plot;
pub mod polygon;
pub mod series;
pub mod shapes;
pub mod table;
pub mod text;
pub mod window;

pub use base::ItemBehavior;
pub use drawlist::{DrawLayer, Drawlist};
pub use group::Group;
pub use plot::{Plot, PlotAxis};
pub use polygon::{DrawPolygon, DrawPolyline, DrawText};
pub use series::{ErrorSeries, Series, SeriesStyle};
pub use shapes::{DrawArrow, DrawBezierCubic, DrawCircle, DrawLine, DrawQuad, DrawRect, DrawTriangle, Stroke};
pub use table::{Table, TableColumn, TableRow};
pub use text::{Button, Text};
pub use window::Window;

use crate::draw::{Backend, ChildPass};
use crate::error::{DrawFault, ValidationError};
use crate::item::{CommonConfig, ItemKind};
use crate::schema::{ConfigMap, DecodedArgs, ItemSchema};
use crate::value::AttrValue;
use crate::Point;

/// 类型的参数表
pub fn schema(kind: ItemKind) -> ItemSchema {
    match kind {
        ItemKind::Window => window::schema(),
        ItemKind::Group => group::schema(),
        ItemKind::Text => text::text_schema(),
        ItemKind::Button => text::button_schema(),
        ItemKind::Drawlist => drawlist::drawlist_schema(),
        ItemKind::DrawLayer => drawlist::layer_schema(),
        ItemKind::DrawLine => shapes::line_schema(),
        ItemKind::DrawArrow => shapes::arrow_schema(),
        ItemKind::DrawRect => shapes::rect_schema(),
        ItemKind::DrawCircle => shapes::circle_schema(),
        ItemKind::DrawTriangle => shapes::triangle_schema(),
        ItemKind::DrawQuad => shapes::quad_schema(),
        ItemKind::DrawBezierCubic => shapes::bezier_schema(),
        ItemKind::DrawPolyline => polygon::polyline_schema(),
        ItemKind::DrawPolygon => polygon::polygon_schema(),
        ItemKind::DrawText => polygon::text_schema(),
        ItemKind::Plot => plot::plot_schema(),
        ItemKind::PlotAxis => plot::axis_schema(),
        ItemKind::LineSeries => series::line_schema(),
        ItemKind::ScatterSeries => series::scatter_schema(),
        ItemKind::ErrorSeries => series::error_schema(),
        ItemKind::Table => table::table_schema(),
        ItemKind::TableColumn => table::column_schema(),
        ItemKind::TableRow => table::row_schema(),
    }
}

/// 按类型区分的专有数据
#[derive(Debug, Clone, PartialEq)]
pub enum ItemData {
    Window(Window),
    Group(Group),
    Text(Text),
    Button(Button),
    Drawlist(Drawlist),
    DrawLayer(DrawLayer),
    Line(DrawLine),
    Arrow(DrawArrow),
    Rect(DrawRect),
    Circle(DrawCircle),
    Triangle(DrawTriangle),
    Quad(DrawQuad),
    Bezier(DrawBezierCubic),
    Polyline(DrawPolyline),
    Polygon(DrawPolygon),
    DrawText(DrawText),
    Plot(Plot),
    PlotAxis(PlotAxis),
    Series(Series),
    ErrorSeries(ErrorSeries),
    Table(Table),
    TableColumn(TableColumn),
    TableRow(TableRow),
}

macro_rules! dispatch {
    ($data:expr, $inner:ident => $body:expr) => {
        match $data {
            ItemData::Window($inner) => $body,
            ItemData::Group($inner) => $body,
            ItemData::Text($inner) => $body,
            ItemData::Button($inner) => $body,
            ItemData::Drawlist($inner) => $body,
            ItemData::DrawLayer($inner) => $body,
            ItemData::Line($inner) => $body,
            ItemData::Arrow($inner) => $body,
            ItemData::Rect($inner) => $body,
            ItemData::Circle($inner) => $body,
            ItemData::Triangle($inner) => $body,
            ItemData::Quad($inner) => $body,
            ItemData::Bezier($inner) => $body,
            ItemData::Polyline($inner) => $body,
            ItemData::Polygon($inner) => $body,
            ItemData::DrawText($inner) => $body,
            ItemData::Plot($inner) => $body,
            ItemData::PlotAxis($inner) => $body,
            ItemData::Series($inner) => $body,
            ItemData::ErrorSeries($inner) => $body,
            ItemData::Table($inner) => $body,
            ItemData::TableColumn($inner) => $body,
            ItemData::TableRow($inner) => $body,
        }
    };
}

impl ItemData {
    pub fn new(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Window => ItemData::Window(Window::default()),
            ItemKind::Group => ItemData::Group(Group::default()),
            ItemKind::Text => ItemData::Text(Text::default()),
            ItemKind::Button => ItemData::Button(Button::default()),
            ItemKind::Drawlist => ItemData::Drawlist(Drawlist::default()),
            ItemKind::DrawLayer => ItemData::DrawLayer(DrawLayer),
            ItemKind::DrawLine => ItemData::Line(DrawLine::default()),
            ItemKind::DrawArrow => ItemData::Arrow(DrawArrow::default()),
            ItemKind::DrawRect => ItemData::Rect(DrawRect::default()),
            ItemKind::DrawCircle => ItemData::Circle(DrawCircle::default()),
            ItemKind::DrawTriangle => ItemData::Triangle(DrawTriangle::default()),
            ItemKind::DrawQuad => ItemData::Quad(DrawQuad::default()),
            ItemKind::DrawBezierCubic => ItemData::Bezier(DrawBezierCubic::default()),
            ItemKind::DrawPolyline => ItemData::Polyline(DrawPolyline::default()),
            ItemKind::DrawPolygon => ItemData::Polygon(DrawPolygon::default()),
            ItemKind::DrawText => ItemData::DrawText(DrawText::default()),
            ItemKind::Plot => ItemData::Plot(Plot::default()),
            ItemKind::PlotAxis => ItemData::PlotAxis(PlotAxis::default()),
            ItemKind::LineSeries => ItemData::Series(Series::new(SeriesStyle::Line)),
            ItemKind::ScatterSeries => ItemData::Series(Series::new(SeriesStyle::Scatter)),
            ItemKind::ErrorSeries => ItemData::ErrorSeries(ErrorSeries::default()),
            ItemKind::Table => ItemData::Table(Table::default()),
            ItemKind::TableColumn => ItemData::TableColumn(TableColumn::default()),
            ItemKind::TableRow => ItemData::TableRow(TableRow::default()),
        }
    }

    fn behavior(&self) -> &dyn ItemBehavior {
        dispatch!(self, inner => inner)
    }

    fn behavior_mut(&mut self) -> &mut dyn ItemBehavior {
        dispatch!(self, inner => inner)
    }

    /// 从模板复制专有字段，行号等由树维护的字段保持不变
    pub fn copy_from(&mut self, template: &ItemData) {
        let row_index = match self {
            ItemData::TableRow(row) => Some(row.row_index),
            _ => None,
        };
        *self = template.clone();
        if let (ItemData::TableRow(row), Some(index)) = (self, row_index) {
            row.row_index = index;
        }
    }

    pub fn row_index_mut(&mut self) -> Option<&mut usize> {
        match self {
            ItemData::TableRow(row) => Some(&mut row.row_index),
            _ => None,
        }
    }
}

impl ItemBehavior for ItemData {
    fn apply_args(&mut self, args: &DecodedArgs) {
        self.behavior_mut().apply_args(args)
    }

    fn write_config(&self, out: &mut ConfigMap) {
        self.behavior().write_config(out)
    }

    fn draw(&self, common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        self.behavior().draw(common, backend, origin)
    }

    fn value(&self) -> Option<AttrValue> {
        self.behavior().value()
    }

    fn set_value(&mut self, command: &str, value: &AttrValue) -> Result<bool, ValidationError> {
        self.behavior_mut().set_value(command, value)
    }
}
