//! 表格、列与行
//!
//! 列在第一个子槽，行在第二个子槽；行号由树在挂接、移动、删除时重新编号。

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass, ChildScope};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::Point;

pub fn table_schema() -> ItemSchema {
    ItemSchema::builder("add_table", "Adds a table.")
        .common(CommonArgs::WIDGET | CommonArgs::WIDTH | CommonArgs::HEIGHT)
        .keyword("header_row", ParamType::Bool, "True")
        .build()
}

pub fn column_schema() -> ItemSchema {
    ItemSchema::builder("add_table_column", "Adds a table column.")
        .common(
            CommonArgs::TAG
                | CommonArgs::LABEL
                | CommonArgs::PARENT
                | CommonArgs::BEFORE
                | CommonArgs::SHOW
                | CommonArgs::USER_DATA,
        )
        .keyword("init_width", ParamType::Float, "0.0")
        .build()
}

pub fn row_schema() -> ItemSchema {
    ItemSchema::builder("add_table_row", "Adds a table row.")
        .common(
            CommonArgs::TAG
                | CommonArgs::PARENT
                | CommonArgs::BEFORE
                | CommonArgs::SHOW
                | CommonArgs::USER_DATA,
        )
        .build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header_row: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self { header_row: true }
    }
}

impl ItemBehavior for Table {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.bool("header_row") {
            self.header_row = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "header_row", self.header_row);
    }

    fn draw(&self, common: &CommonConfig, _backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        Ok(ChildPass::new(
            origin,
            ChildScope::Table {
                label: common.label.clone(),
                header_row: self.header_row,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableColumn {
    pub init_width: f32,
}

impl ItemBehavior for TableColumn {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.f32("init_width") {
            self.init_width = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "init_width", self.init_width);
    }

    fn draw(&self, common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.table_setup_column(&common.label, self.init_width);
        Ok(ChildPass::inline(origin))
    }
}

/// 表格行，单元格内容是第一个子槽里的控件，按顺序对应各列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub row_index: usize,
}

impl ItemBehavior for TableRow {
    fn apply_args(&mut self, _args: &DecodedArgs) {}

    fn write_config(&self, _out: &mut ConfigMap) {}

    fn draw(&self, _common: &CommonConfig, _backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        Ok(ChildPass::new(
            origin,
            ChildScope::TableRow {
                index: self.row_index,
            },
        ))
    }
}
