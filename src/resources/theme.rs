//! 主题资源
//!
//! 主题由若干组件组成，每个组件针对全部类型或某一种类型，
//! 保存颜色项与样式变量项。

use crate::item::ItemKind;
use crate::value::ItemId;
use crate::Color;
use serde::Serialize;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.name() == name)
            }
        }
    };
}

named_enum! {
    /// 主题颜色项
    ThemeCol {
        Text => "text",
        TextDisabled => "text_disabled",
        WindowBg => "window_bg",
        ChildBg => "child_bg",
        Border => "border",
        FrameBg => "frame_bg",
        Button => "button",
        ButtonHovered => "button_hovered",
        ButtonActive => "button_active",
        Header => "header",
        TableHeaderBg => "table_header_bg",
        TableRowBg => "table_row_bg",
        PlotBg => "plot_bg",
        PlotBorder => "plot_border",
        LegendBg => "legend_bg",
        Line => "line",
        Fill => "fill",
        ErrorBar => "error_bar",
    }
}

named_enum! {
    /// 样式变量，单值变量只用第一个分量
    StyleVar {
        Alpha => "alpha",
        WindowPadding => "window_padding",
        WindowRounding => "window_rounding",
        FramePadding => "frame_padding",
        FrameRounding => "frame_rounding",
        ItemSpacing => "item_spacing",
        CellPadding => "cell_padding",
        PlotPadding => "plot_padding",
        LineWeight => "line_weight",
        MarkerSize => "marker_size",
        ErrorBarSize => "error_bar_size",
        ErrorBarWeight => "error_bar_weight",
    }
}

/// 组件作用目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeTarget {
    All,
    Kind(ItemKind),
}

impl ThemeTarget {
    /// "all" 或类型短名
    pub fn parse(name: &str) -> Option<Self> {
        if name == "all" {
            return Some(ThemeTarget::All);
        }
        ItemKind::from_name(name).map(ThemeTarget::Kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeComponent {
    pub target: ThemeTarget,
    pub colors: Vec<(ThemeCol, Color)>,
    pub styles: Vec<(StyleVar, [f32; 2])>,
}

/// 一次主题应用得到的条目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeEntries {
    pub colors: Vec<(ThemeCol, Color)>,
    pub styles: Vec<(StyleVar, [f32; 2])>,
}

impl ThemeEntries {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.styles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub id: ItemId,
    pub name: String,
    pub components: Vec<ThemeComponent>,
}

impl Theme {
    pub fn new(name: &str) -> Self {
        Self {
            id: ItemId::next(),
            name: name.to_string(),
            components: Vec::new(),
        }
    }

    fn component_mut(&mut self, target: ThemeTarget) -> &mut ThemeComponent {
        let index = match self.components.iter().position(|c| c.target == target) {
            Some(index) => index,
            None => {
                self.components.push(ThemeComponent {
                    target,
                    colors: Vec::new(),
                    styles: Vec::new(),
                });
                self.components.len() - 1
            }
        };
        &mut self.components[index]
    }

    /// 设置颜色项，同一目标同一项后写覆盖
    pub fn set_color(&mut self, target: ThemeTarget, col: ThemeCol, color: Color) {
        let component = self.component_mut(target);
        match component.colors.iter_mut().find(|(c, _)| *c == col) {
            Some(entry) => entry.1 = color,
            None => component.colors.push((col, color)),
        }
    }

    pub fn set_style(&mut self, target: ThemeTarget, var: StyleVar, value: [f32; 2]) {
        let component = self.component_mut(target);
        match component.styles.iter_mut().find(|(v, _)| *v == var) {
            Some(entry) => entry.1 = value,
            None => component.styles.push((var, value)),
        }
    }

    /// 对某类型生效的条目
    ///
    /// `fresh` 为真表示主题在本节点新压入，全部类型组件与匹配类型组件都生效；
    /// 继承来的主题只补上匹配类型的组件。
    pub fn entries_for(&self, kind: ItemKind, fresh: bool) -> ThemeEntries {
        let mut entries = ThemeEntries::default();
        for component in &self.components {
            let applies = match component.target {
                ThemeTarget::All => fresh,
                ThemeTarget::Kind(k) => k == kind,
            };
            if applies {
                entries.colors.extend(component.colors.iter().copied());
                entries.styles.extend(component.styles.iter().copied());
            }
        }
        entries
    }
}
