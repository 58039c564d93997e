//! 基本绘图图元：线、箭头、矩形、圆、三角形、四边形、贝塞尔曲线
//!
//! 坐标相对父画布，绘制时加上父项给出的原点。

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType, SchemaBuilder};
use crate::{Color, Point};

const WHITE: &str = "(255, 255, 255, 255)";
const NO_FILL: &str = "(0, 0, 0, 0)";

fn stroke(builder: SchemaBuilder) -> SchemaBuilder {
    builder
        .keyword("color", ParamType::Color, WHITE)
        .keyword("thickness", ParamType::Float, "1.0")
        .positive()
}

fn filled(builder: SchemaBuilder) -> SchemaBuilder {
    stroke(builder.keyword("fill", ParamType::Color, NO_FILL))
}

pub fn line_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_line", "Adds a line.")
        .common(CommonArgs::DRAWING)
        .required("p1", ParamType::Point)
        .required("p2", ParamType::Point);
    stroke(builder).build()
}

pub fn arrow_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_arrow", "Adds an arrow pointing at p1.")
        .common(CommonArgs::DRAWING)
        .required("p1", ParamType::Point)
        .required("p2", ParamType::Point);
    stroke(builder)
        .keyword("size", ParamType::Int, "4")
        .positive()
        .build()
}

pub fn rect_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_rectangle", "Adds a rectangle.")
        .common(CommonArgs::DRAWING)
        .required("pmin", ParamType::Point)
        .required("pmax", ParamType::Point);
    filled(builder)
        .keyword("rounding", ParamType::Float, "0.0")
        .build()
}

pub fn circle_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_circle", "Adds a circle.")
        .common(CommonArgs::DRAWING)
        .required("center", ParamType::Point)
        .required("radius", ParamType::Float)
        .positive();
    filled(builder)
        .keyword("segments", ParamType::Int, "0")
        .build()
}

pub fn triangle_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_triangle", "Adds a triangle.")
        .common(CommonArgs::DRAWING)
        .required("p1", ParamType::Point)
        .required("p2", ParamType::Point)
        .required("p3", ParamType::Point);
    filled(builder).build()
}

pub fn quad_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_quad", "Adds a quad.")
        .common(CommonArgs::DRAWING)
        .required("p1", ParamType::Point)
        .required("p2", ParamType::Point)
        .required("p3", ParamType::Point)
        .required("p4", ParamType::Point);
    filled(builder).build()
}

pub fn bezier_schema() -> ItemSchema {
    let builder = ItemSchema::builder("draw_bezier_cubic", "Adds a cubic bezier curve.")
        .common(CommonArgs::DRAWING)
        .required("p1", ParamType::Point)
        .required("p2", ParamType::Point)
        .required("p3", ParamType::Point)
        .required("p4", ParamType::Point);
    stroke(builder)
        .keyword("segments", ParamType::Int, "0")
        .build()
}

/// 线条颜色与粗细
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub thickness: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            thickness: 1.0,
        }
    }
}

impl Stroke {
    pub fn apply(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.color("color") {
            self.color = v;
        }
        if let Some(v) = args.f32("thickness") {
            self.thickness = v;
        }
    }

    pub fn write(&self, out: &mut ConfigMap) {
        put(out, "color", self.color);
        put(out, "thickness", self.thickness);
    }
}

fn apply_fill(fill: &mut Color, args: &DecodedArgs) {
    if let Some(v) = args.color("fill") {
        *fill = v;
    }
}

fn apply_point(point: &mut Point, args: &DecodedArgs, name: &str) {
    if let Some(v) = args.point(name) {
        *point = v;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawLine {
    pub p1: Point,
    pub p2: Point,
    pub stroke: Stroke,
}

impl ItemBehavior for DrawLine {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_point(&mut self.p1, args, "p1");
        apply_point(&mut self.p2, args, "p2");
        self.stroke.apply(args);
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "p1", self.p1);
        put(out, "p2", self.p2);
        self.stroke.write(out);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.line(self.p1 + origin, self.p2 + origin, self.stroke.color, self.stroke.thickness);
        Ok(ChildPass::inline(origin))
    }
}

/// 箭头：p2 到 p1 的线段加上 p1 处的三角形箭头
#[derive(Debug, Clone, PartialEq)]
pub struct DrawArrow {
    pub p1: Point,
    pub p2: Point,
    pub stroke: Stroke,
    pub size: i64,
}

impl Default for DrawArrow {
    fn default() -> Self {
        Self {
            p1: Point::ZERO,
            p2: Point::ZERO,
            stroke: Stroke::default(),
            size: 4,
        }
    }
}

impl DrawArrow {
    /// 箭头三角形的三个顶点（尖端在前），线段退化时返回 None
    pub fn head(&self) -> Option<[Point; 3]> {
        let dx = self.p1.x - self.p2.x;
        let dy = self.p1.y - self.p2.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f32::EPSILON {
            return None;
        }
        let (ux, uy) = (dx / len, dy / len);
        let size = self.size as f32;
        let base = Point::new(self.p1.x - ux * size, self.p1.y - uy * size);
        let half = size * 0.5;
        Some([
            self.p1,
            Point::new(base.x - uy * half, base.y + ux * half),
            Point::new(base.x + uy * half, base.y - ux * half),
        ])
    }
}

impl ItemBehavior for DrawArrow {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_point(&mut self.p1, args, "p1");
        apply_point(&mut self.p2, args, "p2");
        self.stroke.apply(args);
        if let Some(v) = args.int("size") {
            self.size = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "p1", self.p1);
        put(out, "p2", self.p2);
        self.stroke.write(out);
        put(out, "size", self.size);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        let Stroke { color, thickness } = self.stroke;
        match self.head() {
            Some([tip, left, right]) => {
                let base = left.lerp(&right, 0.5);
                backend.line(self.p2 + origin, base + origin, color, thickness);
                backend.triangle(tip + origin, left + origin, right + origin, color, color, thickness);
            }
            None => backend.line(self.p2 + origin, self.p1 + origin, color, thickness),
        }
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawRect {
    pub pmin: Point,
    pub pmax: Point,
    pub stroke: Stroke,
    pub fill: Color,
    pub rounding: f32,
}

impl ItemBehavior for DrawRect {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_point(&mut self.pmin, args, "pmin");
        apply_point(&mut self.pmax, args, "pmax");
        self.stroke.apply(args);
        apply_fill(&mut self.fill, args);
        if let Some(v) = args.f32("rounding") {
            self.rounding = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "pmin", self.pmin);
        put(out, "pmax", self.pmax);
        self.stroke.write(out);
        put(out, "fill", self.fill);
        put(out, "rounding", self.rounding);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.rect(
            self.pmin + origin,
            self.pmax + origin,
            self.stroke.color,
            self.fill,
            self.rounding,
            self.stroke.thickness,
        );
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCircle {
    pub center: Point,
    pub radius: f32,
    pub stroke: Stroke,
    pub fill: Color,
    pub segments: i64,
}

impl Default for DrawCircle {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            radius: 1.0,
            stroke: Stroke::default(),
            fill: Color::TRANSPARENT,
            segments: 0,
        }
    }
}

impl ItemBehavior for DrawCircle {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_point(&mut self.center, args, "center");
        if let Some(v) = args.f32("radius") {
            self.radius = v;
        }
        self.stroke.apply(args);
        apply_fill(&mut self.fill, args);
        if let Some(v) = args.int("segments") {
            self.segments = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "center", self.center);
        put(out, "radius", self.radius);
        self.stroke.write(out);
        put(out, "fill", self.fill);
        put(out, "segments", self.segments);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.circle(
            self.center + origin,
            self.radius,
            self.stroke.color,
            self.fill,
            self.stroke.thickness,
            self.segments.max(0) as u32,
        );
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawTriangle {
    pub points: [Point; 3],
    pub stroke: Stroke,
    pub fill: Color,
}

impl ItemBehavior for DrawTriangle {
    fn apply_args(&mut self, args: &DecodedArgs) {
        for (point, name) in self.points.iter_mut().zip(["p1", "p2", "p3"]) {
            apply_point(point, args, name);
        }
        self.stroke.apply(args);
        apply_fill(&mut self.fill, args);
    }

    fn write_config(&self, out: &mut ConfigMap) {
        for (point, name) in self.points.iter().zip(["p1", "p2", "p3"]) {
            put(out, name, *point);
        }
        self.stroke.write(out);
        put(out, "fill", self.fill);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        let [p1, p2, p3] = self.points.map(|p| p + origin);
        backend.triangle(p1, p2, p3, self.stroke.color, self.fill, self.stroke.thickness);
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawQuad {
    pub points: [Point; 4],
    pub stroke: Stroke,
    pub fill: Color,
}

impl ItemBehavior for DrawQuad {
    fn apply_args(&mut self, args: &DecodedArgs) {
        for (point, name) in self.points.iter_mut().zip(["p1", "p2", "p3", "p4"]) {
            apply_point(point, args, name);
        }
        self.stroke.apply(args);
        apply_fill(&mut self.fill, args);
    }

    fn write_config(&self, out: &mut ConfigMap) {
        for (point, name) in self.points.iter().zip(["p1", "p2", "p3", "p4"]) {
            put(out, name, *point);
        }
        self.stroke.write(out);
        put(out, "fill", self.fill);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.quad(
            self.points.map(|p| p + origin),
            self.stroke.color,
            self.fill,
            self.stroke.thickness,
        );
        Ok(ChildPass::inline(origin))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawBezierCubic {
    pub points: [Point; 4],
    pub stroke: Stroke,
    pub segments: i64,
}

impl ItemBehavior for DrawBezierCubic {
    fn apply_args(&mut self, args: &DecodedArgs) {
        for (point, name) in self.points.iter_mut().zip(["p1", "p2", "p3", "p4"]) {
            apply_point(point, args, name);
        }
        self.stroke.apply(args);
        if let Some(v) = args.int("segments") {
            self.segments = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        for (point, name) in self.points.iter().zip(["p1", "p2", "p3", "p4"]) {
            put(out, name, *point);
        }
        self.stroke.write(out);
        put(out, "segments", self.segments);
    }

    fn draw(&self, _common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.bezier_cubic(
            self.points.map(|p| p + origin),
            self.stroke.color,
            self.stroke.thickness,
            self.segments.max(0) as u32,
        );
        Ok(ChildPass::inline(origin))
    }
}
