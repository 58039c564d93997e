//! Mini Items - 保留模式条目树
//! 每帧遍历条目树驱动即时模式后端，宿主脚本通过参数包增删改条目

mod color;
mod geometry;

pub use color::Color;
pub use geometry::{Point, Rect, Size};

pub mod config;
pub mod error;
pub mod value;

pub use config::{ConfigError, EngineConfig};
pub use error::{DrawFault, ItemError, ValidationError};
pub use value::{AttrBundle, AttrValue, ItemId, ItemRef};

// 参数表与编解码
pub mod schema;

// 条目类型、兼容规则、各类型行为
pub mod item;
pub mod items;

pub use item::ItemKind;

// 条目树
pub mod tree;

pub use tree::ItemTree;

// 绘制遍历与后端接口
pub mod draw;

pub use draw::{Backend, FrameRecorder, FrameStats};

// 主题与字体
pub mod resources;

// 宿主调用入口
pub mod host;

pub use host::HostApi;

// JS 引擎绑定
pub mod js;

// 应用运行时
pub mod runtime;

pub use runtime::ItemApp;

// FFI 导出
mod ffi;
pub use ffi::*;

// 单元测试
#[cfg(test)]
mod tests;
