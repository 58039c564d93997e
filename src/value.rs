//! 宿主参数值、参数包与条目标识

use crate::{Color, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static ITEM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 条目 ID，进程内单调递增，永不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// 分配下一个 ID
    pub fn next() -> Self {
        Self(ITEM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 条目引用：数字 ID 或字符串别名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Id(ItemId),
    Alias(String),
}

impl From<ItemId> for ItemRef {
    fn from(id: ItemId) -> Self {
        ItemRef::Id(id)
    }
}

impl From<&str> for ItemRef {
    fn from(alias: &str) -> Self {
        ItemRef::Alias(alias.to_string())
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Id(id) => write!(f, "{}", id),
            ItemRef::Alias(alias) => write!(f, "'{}'", alias),
        }
    }
}

/// 宿主传入的无类型值
///
/// 与 JSON 一一对应：null / bool / 整数 / 浮点 / 字符串 / 数组 / 对象。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AttrValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// 值类型名，用于错误信息
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::None => "none",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
            AttrValue::List(_) => "list",
            AttrValue::Map(_) => "map",
        }
    }

    /// 简短描述（错误信息里的 got 部分）
    pub fn describe(&self) -> String {
        let text = serde_json::to_string(self).unwrap_or_else(|_| self.type_name().to_string());
        if text.chars().count() > 48 {
            let head: String = text.chars().take(45).collect();
            format!("{}... ({})", head, self.type_name())
        } else {
            format!("{} ({})", text, self.type_name())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AttrValue::None)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self { AttrValue::Bool(v) }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self { AttrValue::Int(v as i64) }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self { AttrValue::Int(v) }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self { AttrValue::Float(v as f64) }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self { AttrValue::Float(v) }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self { AttrValue::Str(v.to_string()) }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self { AttrValue::Str(v) }
}

impl From<ItemId> for AttrValue {
    fn from(id: ItemId) -> Self { AttrValue::Int(id.0 as i64) }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        AttrValue::List(c.components().iter().map(|v| AttrValue::Int(*v as i64)).collect())
    }
}

impl From<Point> for AttrValue {
    fn from(p: Point) -> Self {
        AttrValue::List(vec![AttrValue::Float(p.x as f64), AttrValue::Float(p.y as f64)])
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(items: Vec<T>) -> Self {
        AttrValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttrValue::None)
    }
}

/// 参数包：位置参数 + 关键字参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrBundle {
    #[serde(default)]
    pub args: Vec<AttrValue>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, AttrValue>,
}

impl AttrBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加位置参数
    pub fn arg(mut self, value: impl Into<AttrValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// 设置关键字参数
    pub fn kwarg(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.kwargs.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }

    /// 关键字部分作为一个 Map 值返回
    pub fn into_value(self) -> AttrValue {
        AttrValue::Map(self.kwargs)
    }
}
