//! 折线、多边形与画布文字

use super::base::ItemBehavior;
use super::shapes::Stroke;
use crate::draw::{Backend, ChildPass};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::{Color, Point};

pub fn polyline_schema() -> ItemSchema {
    ItemSchema::builder("draw_polyline", "Adds a polyline.")
        .common(CommonArgs::DRAWING)
        .required("points", ParamType::PointList)
        .keyword("closed", ParamType::Bool, "False")
        .keyword("color", ParamType::Color, "(255, 255, 255, 255)")
        .keyword("thickness", ParamType::Float, "1.0")
        .positive()
        .build()
}

pub fn polygon_schema() -> ItemSchema {
    ItemSchema::builder("draw_polygon", "Adds a polygon.")
        .common(CommonArgs::DRAWING)
        .required("points", ParamType::PointList)
        .keyword("color", ParamType::Color, "(255, 255, 255, 255)")
        .keyword("fill", ParamType::Color, "(0, 0, 0, 0)")
        .keyword("thickness", ParamType::Float, "1.0")
        .positive()
        .build()
}

pub fn text_schema() -> ItemSchema {
    ItemSchema::builder("draw_text", "Adds text to a drawing.")
        .common(CommonArgs::DRAWING)
        .required("pos", ParamType::Point)
        .required("text", ParamType::Str)
        .keyword("color", ParamType::Color, "(255, 255, 255, 255)")
        .keyword("size", ParamType::Float, "10.0")
        .positive()
        .build()
}

fn offset_all(points: &[Point], origin: Point) -> Vec<Point> {
    points.iter().map(|p| *p + origin).collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawPolyline {
    pub points: Vec<Point>,
    pub closed: bool,
    pub stroke: Stroke,
}

impl ItemBehavior for DrawPolyline {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(points) = args.points("points") {
            self.points = points;
        }
        if let Some(v) = args.bool("closed") {
            self.closed = v;
        }
        self.stroke.apply(args);
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "points", self.points.clone());
        put(out, "closed", self.closed);
        self.stroke.write(out);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        if self.points.len() < 2 {
            return Err(DrawFault::TooFewPoints { needed: 2, got: self.points.len() });
        }
        backend.polyline(
            &offset_all(&self.points, origin),
            self.stroke.color,
            self.closed,
            self.stroke.thickness,
        );
        Ok(ChildPass::inline(origin))
    }
}

/// 多边形：描边沿点序闭合，填充色 alpha 为 0 时不填充
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawPolygon {
    pub points: Vec<Point>,
    pub stroke: Stroke,
    pub fill: Color,
}

impl ItemBehavior for DrawPolygon {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(points) = args.points("points") {
            self.points = points;
        }
        self.stroke.apply(args);
        if let Some(v) = args.color("fill") {
            self.fill = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "points", self.points.clone());
        self.stroke.write(out);
        put(out, "fill", self.fill);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        if self.points.len() < 3 {
            return Err(DrawFault::TooFewPoints { needed: 3, got: self.points.len() });
        }
        backend.polygon(
            &offset_all(&self.points, origin),
            self.stroke.color,
            self.fill,
            self.stroke.thickness,
        );
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub pos: Point,
    pub text: String,
    pub color: Color,
    pub size: f32,
}

impl Default for DrawText {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            text: String::new(),
            color: Color::WHITE,
            size: 10.0,
        }
    }
}

impl ItemBehavior for DrawText {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.point("pos") {
            self.pos = v;
        }
        if let Some(v) = args.string("text") {
            self.text = v;
        }
        if let Some(v) = args.color("color") {
            self.color = v;
        }
        if let Some(v) = args.f32("size") {
            self.size = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "pos", self.pos);
        put(out, "text", self.text.as_str());
        put(out, "color", self.color);
        put(out, "size", self.size);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.text_at(self.pos + origin, &self.text, self.color, self.size);
        Ok(ChildPass::inline(origin))
    }
}
