//! 数据序列：折线、散点、误差棒
//!
//! 序列挂在坐标轴下，图例弹窗里的子控件在绘图区原点处绘制。

use super::base::{float_lists, ItemBehavior};
use crate::draw::{Backend, ChildPass, ChildScope};
use crate::error::{DrawFault, ValidationError};
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::value::AttrValue;
use crate::Point;

const SERIES_COMMON: CommonArgs = CommonArgs::TAG
    .union(CommonArgs::LABEL)
    .union(CommonArgs::PARENT)
    .union(CommonArgs::BEFORE)
    .union(CommonArgs::SHOW)
    .union(CommonArgs::USER_DATA);

pub fn line_schema() -> ItemSchema {
    ItemSchema::builder("add_line_series", "Adds a line series to a plot.")
        .common(SERIES_COMMON)
        .required("x", ParamType::FloatList)
        .required("y", ParamType::FloatList)
        .build()
}

pub fn scatter_schema() -> ItemSchema {
    ItemSchema::builder("add_scatter_series", "Adds a scatter series to a plot.")
        .common(SERIES_COMMON)
        .required("x", ParamType::FloatList)
        .required("y", ParamType::FloatList)
        .build()
}

pub fn error_schema() -> ItemSchema {
    ItemSchema::builder("add_error_series", "Adds an error series to a plot.")
        .common(SERIES_COMMON)
        .required("x", ParamType::FloatList)
        .required("y", ParamType::FloatList)
        .required("negative", ParamType::FloatList)
        .required("positive", ParamType::FloatList)
        .keyword("contribute_to_bounds", ParamType::Bool, "True")
        .keyword("horizontal", ParamType::Bool, "False")
        .build()
}

fn legend(common: &CommonConfig, origin: Point) -> ChildPass {
    ChildPass::new(
        origin,
        ChildScope::LegendPopup {
            label: common.label.clone(),
        },
    )
}

fn apply_list(target: &mut Vec<f64>, args: &DecodedArgs, name: &str) {
    if let Some(v) = args.float_list(name) {
        *target = v;
    }
}

/// 折线或散点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeriesStyle {
    #[default]
    Line,
    Scatter,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub style: SeriesStyle,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(style: SeriesStyle) -> Self {
        Self { style, ..Default::default() }
    }
}

impl ItemBehavior for Series {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_list(&mut self.x, args, "x");
        apply_list(&mut self.y, args, "y");
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "x", self.x.clone());
        put(out, "y", self.y.clone());
    }

    fn draw(&self, common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        DrawFault::check_lengths(&[("x", self.x.len()), ("y", self.y.len())])?;
        match self.style {
            SeriesStyle::Line => backend.plot_line(&common.label, &self.x, &self.y),
            SeriesStyle::Scatter => backend.plot_scatter(&common.label, &self.x, &self.y),
        }
        Ok(legend(common, origin))
    }

    fn value(&self) -> Option<AttrValue> {
        Some(AttrValue::from(vec![self.x.clone(), self.y.clone()]))
    }

    fn set_value(&mut self, command: &str, value: &AttrValue) -> Result<bool, ValidationError> {
        let mut lists = float_lists(command, value, 2)?.into_iter();
        self.x = lists.next().unwrap_or_default();
        self.y = lists.next().unwrap_or_default();
        Ok(true)
    }
}

/// 误差棒序列
///
/// 四个序列长度在绘制时检查，配置阶段允许逐个关键字更新造成的暂时不等长。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub negative: Vec<f64>,
    pub positive: Vec<f64>,
    pub contribute_to_bounds: bool,
    pub horizontal: bool,
}

impl Default for ErrorSeries {
    fn default() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            negative: Vec::new(),
            positive: Vec::new(),
            contribute_to_bounds: true,
            horizontal: false,
        }
    }
}

impl ItemBehavior for ErrorSeries {
    fn apply_args(&mut self, args: &DecodedArgs) {
        apply_list(&mut self.x, args, "x");
        apply_list(&mut self.y, args, "y");
        apply_list(&mut self.negative, args, "negative");
        apply_list(&mut self.positive, args, "positive");
        if let Some(v) = args.bool("contribute_to_bounds") {
            self.contribute_to_bounds = v;
        }
        if let Some(v) = args.bool("horizontal") {
            self.horizontal = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "x", self.x.clone());
        put(out, "y", self.y.clone());
        put(out, "negative", self.negative.clone());
        put(out, "positive", self.positive.clone());
        put(out, "contribute_to_bounds", self.contribute_to_bounds);
        put(out, "horizontal", self.horizontal);
    }

    fn draw(&self, common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        DrawFault::check_lengths(&[
            ("x", self.x.len()),
            ("y", self.y.len()),
            ("negative", self.negative.len()),
            ("positive", self.positive.len()),
        ])?;
        if self.horizontal {
            backend.plot_error_bars_h(&common.label, &self.x, &self.y, &self.negative, &self.positive);
        } else {
            backend.plot_error_bars(&common.label, &self.x, &self.y, &self.negative, &self.positive);
        }
        Ok(legend(common, origin))
    }

    fn value(&self) -> Option<AttrValue> {
        Some(AttrValue::from(vec![
            self.x.clone(),
            self.y.clone(),
            self.negative.clone(),
            self.positive.clone(),
        ]))
    }

    fn set_value(&mut self, command: &str, value: &AttrValue) -> Result<bool, ValidationError> {
        let mut lists = float_lists(command, value, 4)?.into_iter();
        self.x = lists.next().unwrap_or_default();
        self.y = lists.next().unwrap_or_default();
        self.negative = lists.next().unwrap_or_default();
        self.positive = lists.next().unwrap_or_default();
        Ok(true)
    }
}
