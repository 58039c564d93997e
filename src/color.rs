//! 颜色模块

use serde::Serialize;

/// RGBA 颜色，分量 0-255
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// 从宿主传入的 3 或 4 个分量构建，alpha 缺省为 255
    ///
    /// 分量超出 0-255 时截断。
    pub fn from_components(components: &[f64]) -> Option<Self> {
        let clamp = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        match components {
            [r, g, b] => Some(Self::rgb(clamp(*r), clamp(*g), clamp(*b))),
            [r, g, b, a] => Some(Self::new(clamp(*r), clamp(*g), clamp(*b), clamp(*a))),
            _ => None,
        }
    }

    pub fn components(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
