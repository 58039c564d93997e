//! 窗口：唯一的顶层容器

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass, ChildScope};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::Point;

pub fn schema() -> ItemSchema {
    ItemSchema::builder("add_window", "Creates a new window for following items to be added to.")
        .common(
            CommonArgs::TAG
                | CommonArgs::LABEL
                | CommonArgs::SHOW
                | CommonArgs::USER_DATA
                | CommonArgs::WIDTH
                | CommonArgs::HEIGHT
                | CommonArgs::POS,
        )
        .keyword("no_title_bar", ParamType::Bool, "False")
        .build()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub no_title_bar: bool,
}

impl ItemBehavior for Window {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.bool("no_title_bar") {
            self.no_title_bar = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "no_title_bar", self.no_title_bar);
    }

    fn draw(
        &self,
        common: &CommonConfig,
        _backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        let label = if self.no_title_bar {
            format!("##{}", common.label)
        } else {
            common.label.clone()
        };
        Ok(ChildPass::new(
            origin,
            ChildScope::Window {
                label,
                pos: common.pos,
                size: common.size(),
            },
        ))
    }
}
