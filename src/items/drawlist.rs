//! 画布与绘图层
//!
//! 画布在布局中占一块固定大小的区域，子图元的坐标以该区域左上角为原点，并裁剪到区域内。

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass, ChildScope};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::{Point, Rect, Size};

pub fn drawlist_schema() -> ItemSchema {
    ItemSchema::builder(
        "add_drawlist",
        "Adds a drawing canvas. Coordinates of children are relative to its top left corner.",
    )
    .common(CommonArgs::WIDGET)
    .required("width", ParamType::Int)
    .positive()
    .required("height", ParamType::Int)
    .positive()
    .build()
}

pub fn layer_schema() -> ItemSchema {
    ItemSchema::builder("add_draw_layer", "Groups drawing items inside a drawlist.")
        .common(CommonArgs::DRAWING)
        .build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawlist {
    pub width: i64,
    pub height: i64,
}

impl Default for Drawlist {
    fn default() -> Self {
        Self { width: 1, height: 1 }
    }
}

impl ItemBehavior for Drawlist {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.int("width") {
            self.width = v;
        }
        if let Some(v) = args.int("height") {
            self.height = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "width", self.width);
        put(out, "height", self.height);
    }

    fn draw(
        &self,
        _common: &CommonConfig,
        backend: &mut dyn Backend,
        _origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        let start = backend.cursor_pos();
        let size = Size::new(self.width as f32, self.height as f32);
        backend.reserve(size);
        Ok(ChildPass::new(
            start,
            ChildScope::Clip(Rect::from_origin_size(start, size)),
        ))
    }
}

/// 绘图层只做分组，不改变原点
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawLayer;

impl ItemBehavior for DrawLayer {
    fn apply_args(&mut self, _args: &DecodedArgs) {}

    fn write_config(&self, _out: &mut ConfigMap) {}

    fn draw(
        &self,
        _common: &CommonConfig,
        _backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        Ok(ChildPass::inline(origin))
    }
}
