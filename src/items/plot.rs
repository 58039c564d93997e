//! 图表与坐标轴

use super::base::ItemBehavior;
use crate::draw::{AxisKind, Backend, ChildPass, ChildScope};
use crate::error::DrawFault;
use crate::item::CommonConfig;
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs, ItemSchema, ParamType};
use crate::Point;

pub fn plot_schema() -> ItemSchema {
    ItemSchema::builder("add_plot", "Adds a plot which is used to hold series and can be drawn to with draw commands.")
        .common(CommonArgs::WIDGET | CommonArgs::WIDTH | CommonArgs::HEIGHT)
        .keyword("no_title", ParamType::Bool, "False")
        .build()
}

pub fn axis_schema() -> ItemSchema {
    ItemSchema::builder("add_plot_axis", "Adds an axis to a plot.")
        .common(
            CommonArgs::TAG
                | CommonArgs::LABEL
                | CommonArgs::PARENT
                | CommonArgs::BEFORE
                | CommonArgs::SHOW
                | CommonArgs::USER_DATA,
        )
        .required("axis", ParamType::Enum(&["x", "y"]))
        .build()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plot {
    pub no_title: bool,
}

impl ItemBehavior for Plot {
    fn apply_args(&mut self, args: &DecodedArgs) {
        if let Some(v) = args.bool("no_title") {
            self.no_title = v;
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        put(out, "no_title", self.no_title);
    }

    /// 子项（坐标轴、画布图元）在图表作用域内绘制，原点是绘图区左上角
    fn draw(&self, common: &CommonConfig, _backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        let label = if self.no_title {
            format!("##{}", common.label)
        } else {
            common.label.clone()
        };
        Ok(ChildPass::new(
            origin,
            ChildScope::Plot {
                label,
                size: common.size(),
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotAxis {
    pub axis: AxisKind,
}

impl Default for PlotAxis {
    fn default() -> Self {
        Self { axis: AxisKind::X }
    }
}

impl ItemBehavior for PlotAxis {
    fn apply_args(&mut self, args: &DecodedArgs) {
        match args.string("axis").as_deref() {
            Some("x") => self.axis = AxisKind::X,
            Some("y") => self.axis = AxisKind::Y,
            _ => {}
        }
    }

    fn write_config(&self, out: &mut ConfigMap) {
        let axis = match self.axis {
            AxisKind::X => "x",
            AxisKind::Y => "y",
        };
        put(out, "axis", axis);
    }

    fn draw(&self, common: &CommonConfig, backend: &mut dyn Backend, origin: Point) -> Result<ChildPass, DrawFault> {
        backend.setup_axis(self.axis, &common.label);
        Ok(ChildPass::inline(origin))
    }
}
