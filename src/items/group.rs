//! 分组容器

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass, ChildScope};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::Point;

pub fn schema() -> ItemSchema {
    ItemSchema::builder("add_group", "Creates a group that other widgets can belong to.")
        .common(CommonArgs::WIDGET | CommonArgs::WIDTH)
        .keyword("horizontal", ParamType::Bool, "False")
        .keyword("horizontal_spacing", ParamType::Float, "-1.0")
        .build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub horizontal: bool,
    pub horizontal_spacing: f32,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            horizontal: false,
            horizontal_spacing: -1.0,
        }
    }
}

impl ItemBehavior for Group {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.bool("horizontal") {
            self.horizontal = v;
        }
        if let Some(v) = args.f32("horizontal_spacing") {
            self.horizontal_spacing = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "horizontal", self.horizontal);
        put(out, "horizontal_spacing", self.horizontal_spacing);
    }

    fn draw(
        &self,
        common: &CommonConfig,
        _backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        let scope = ChildScope::Group {
            width: common.width as f32,
            same_line: self.horizontal.then_some(self.horizontal_spacing),
        };
        Ok(ChildPass::new(origin, scope))
    }
}
