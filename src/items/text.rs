//! 文本与按钮

use super::base::ItemBehavior;
use crate::draw::{Backend, ChildPass};
use crate::error::{DrawFault, ValidationError};
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::value::AttrValue;
use crate::{Color, Point};

pub fn text_schema() -> ItemSchema {
    ItemSchema::builder("add_text", "Adds text.")
        .common(CommonArgs::WIDGET)
        .keyword("default_value", ParamType::Str, "''")
        .keyword("color", ParamType::Color, "None")
        .nullable()
        .keyword("bullet", ParamType::Bool, "False")
        .build()
}

pub fn button_schema() -> ItemSchema {
    ItemSchema::builder("add_button", "Adds a button.")
        .common(CommonArgs::WIDGET | CommonArgs::WIDTH | CommonArgs::HEIGHT)
        .keyword("small", ParamType::Bool, "False")
        .build()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub value: String,
    pub color: Option<Color>,
    pub bullet: bool,
}

impl ItemBehavior for Text {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.string("default_value") {
            self.value = v;
        }
        if args.contains("color") {
            self.color = args.color("color");
        }
        if let Some(v) = args.bool("bullet") {
            self.bullet = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "default_value", self.value.as_str());
        put(out, "color", self.color);
        put(out, "bullet", self.bullet);
    }

    fn draw(
        &self,
        _common: &CommonConfig,
        backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        if self.bullet {
            backend.text(&format!("\u{2022} {}", self.value), self.color);
        } else {
            backend.text(&self.value, self.color);
        }
        Ok(ChildPass::inline(origin))
    }

    fn value(&self) -> Option<AttrValue> {
        Some(AttrValue::from(self.value.as_str()))
    }

    fn set_value(&mut self, command: &str, value: &AttrValue) -> Result<bool, ValidationError> {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::new(command, "value", "string", value.describe()))?;
        self.value = text.to_string();
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Button {
    pub small: bool,
}

impl ItemBehavior for Button {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.bool("small") {
            self.small = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "small", self.small);
    }

    fn draw(
        &self,
        common: &CommonConfig,
        backend: &mut dyn Backend,
        origin: Point,
    ) -> Result<ChildPass, DrawFault> {
        if self.small {
            backend.small_button(&common.label);
        } else {
            backend.button(&common.label, common.size());
        }
        Ok(ChildPass::inline(origin))
    }
}
