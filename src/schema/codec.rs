//! 参数包编解码
//!
//! `decode` 把宿主传入的无类型参数包按参数表转成强类型的 [`DecodedArgs`]，
//! 条目再从中读取自己关心的字段。`encode` 方向由各条目把字段写进 [`ConfigMap`]。

use super::literal::parse_literal;
use super::param::{ArgRole, ItemSchema, ParamSpec, ParamType};
use crate::error::ValidationError;
use crate::value::{AttrBundle, AttrValue, ItemId, ItemRef};
use crate::{Color, Point};
use std::collections::BTreeMap;

/// 编码输出：参数名 -> 值
pub type ConfigMap = BTreeMap<String, AttrValue>;

/// 写入一项配置
pub fn put(out: &mut ConfigMap, name: &str, value: impl Into<AttrValue>) {
    out.insert(name.to_string(), value.into());
}

/// 已转换的参数值
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    FloatList(Vec<f64>),
    IntList(Vec<i64>),
    Point(Point),
    PointList(Vec<Point>),
    Color(Color),
    Str(String),
    Ref(ItemRef),
    Enum(String),
    Any(AttrValue),
}

impl Arg {
    /// 转回无类型值（编码方向）
    pub fn to_value(&self) -> AttrValue {
        match self {
            Arg::Null => AttrValue::None,
            Arg::Bool(v) => AttrValue::Bool(*v),
            Arg::Int(v) => AttrValue::Int(*v),
            Arg::Float(v) => AttrValue::Float(*v),
            Arg::FloatList(v) => v.clone().into(),
            Arg::IntList(v) => v.clone().into(),
            Arg::Point(p) => (*p).into(),
            Arg::PointList(points) => points.iter().map(|p| AttrValue::from(*p)).collect::<Vec<_>>().into(),
            Arg::Color(c) => (*c).into(),
            Arg::Str(s) | Arg::Enum(s) => AttrValue::Str(s.clone()),
            Arg::Ref(ItemRef::Id(id)) => (*id).into(),
            Arg::Ref(ItemRef::Alias(alias)) => AttrValue::Str(alias.clone()),
            Arg::Any(v) => v.clone(),
        }
    }
}

/// 解码模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// 创建：缺省的关键字参数取默认值，必填参数必须出现
    Create,
    /// 重新配置：只更新出现的关键字
    Configure,
}

/// 按参数表把单个值转换成 [`Arg`]
pub fn convert(command: &str, spec: &ParamSpec, value: &AttrValue) -> Result<Arg, ValidationError> {
    let fail = || ValidationError::new(command, spec.name, spec.ty.expected(), value.describe());

    if value.is_none() {
        return if spec.nullable || spec.ty == ParamType::Ref {
            Ok(Arg::Null)
        } else {
            Err(fail())
        };
    }

    let arg = match spec.ty {
        ParamType::Bool => match value {
            AttrValue::Bool(v) => Arg::Bool(*v),
            _ => return Err(fail()),
        },
        ParamType::Int => match value {
            AttrValue::Int(v) => Arg::Int(*v),
            AttrValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Arg::Int(*v as i64),
            _ => return Err(fail()),
        },
        ParamType::Float => Arg::Float(value.as_f64().ok_or_else(fail)?),
        ParamType::FloatList => Arg::FloatList(float_list(value).ok_or_else(fail)?),
        ParamType::IntList => {
            let items = value.as_list().ok_or_else(fail)?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    AttrValue::Int(v) => out.push(*v),
                    _ => return Err(fail()),
                }
            }
            Arg::IntList(out)
        }
        ParamType::Point => Arg::Point(point(value).ok_or_else(fail)?),
        ParamType::PointList => {
            let items = value.as_list().ok_or_else(fail)?;
            let points: Option<Vec<Point>> = items.iter().map(point).collect();
            Arg::PointList(points.ok_or_else(fail)?)
        }
        ParamType::Color => {
            let components = float_list(value).ok_or_else(fail)?;
            Arg::Color(Color::from_components(&components).ok_or_else(fail)?)
        }
        ParamType::Str => match value {
            AttrValue::Str(s) => Arg::Str(s.clone()),
            _ => return Err(fail()),
        },
        ParamType::Ref => match value {
            AttrValue::Int(0) => Arg::Null,
            AttrValue::Int(v) if *v > 0 => Arg::Ref(ItemRef::Id(ItemId(*v as u64))),
            AttrValue::Str(s) if s.is_empty() => Arg::Null,
            AttrValue::Str(s) => Arg::Ref(ItemRef::Alias(s.clone())),
            _ => return Err(fail()),
        },
        ParamType::Enum(options) => match value {
            AttrValue::Str(s) if options.contains(&s.as_str()) => Arg::Enum(s.clone()),
            _ => return Err(fail()),
        },
        ParamType::Any => Arg::Any(value.clone()),
    };

    if spec.positive {
        let ok = match &arg {
            Arg::Int(v) => *v > 0,
            Arg::Float(v) => *v > 0.0,
            _ => true,
        };
        if !ok {
            return Err(ValidationError::new(
                command,
                spec.name,
                format!("positive {}", spec.ty.expected()),
                value.describe(),
            ));
        }
    }
    Ok(arg)
}

fn float_list(value: &AttrValue) -> Option<Vec<f64>> {
    value.as_list()?.iter().map(AttrValue::as_f64).collect()
}

fn point(value: &AttrValue) -> Option<Point> {
    let coords = float_list(value)?;
    if !(2..=4).contains(&coords.len()) {
        return None;
    }
    Some(Point::new(coords[0] as f32, coords[1] as f32))
}

/// 解码参数包
///
/// 所有出现的参数都先完成转换，任何一项失败即整体返回错误，调用方字段不会被部分修改。
pub fn decode(schema: &ItemSchema, bundle: &AttrBundle, mode: DecodeMode) -> Result<DecodedArgs, ValidationError> {
    let command = schema.command;
    let mut values = BTreeMap::new();

    let positional: Vec<&ParamSpec> = schema.required().collect();
    if mode == DecodeMode::Configure && !bundle.args.is_empty() {
        return Err(ValidationError::new(
            command,
            "args",
            "keyword arguments only",
            format!("{} positional arguments", bundle.args.len()),
        ));
    }
    if bundle.args.len() > positional.len() {
        return Err(ValidationError::new(
            command,
            "args",
            format!("at most {} positional arguments", positional.len()),
            format!("{} positional arguments", bundle.args.len()),
        ));
    }

    for (spec, value) in positional.iter().zip(&bundle.args) {
        if bundle.kwargs.contains_key(spec.name) {
            return Err(ValidationError::new(
                command,
                spec.name,
                "a single value",
                "both positional and keyword values",
            ));
        }
        values.insert(spec.name, convert(command, spec, value)?);
    }

    for (name, value) in &bundle.kwargs {
        let spec = schema.param(name).ok_or_else(|| {
            ValidationError::new(
                command,
                name,
                format!("one of [{}]", schema.names().join(", ")),
                "unknown keyword",
            )
        })?;
        values.insert(spec.name, convert(command, spec, value)?);
    }

    if mode == DecodeMode::Create {
        for spec in &schema.params {
            if values.contains_key(spec.name) {
                continue;
            }
            match (spec.role, spec.default) {
                (ArgRole::Required, _) | (ArgRole::Keyword, None) => {
                    if spec.role == ArgRole::Required {
                        return Err(ValidationError::new(
                            command,
                            spec.name,
                            spec.ty.expected(),
                            "missing required argument",
                        ));
                    }
                }
                (ArgRole::Keyword, Some(literal)) => {
                    let value = parse_literal(literal).map_err(|reason| {
                        ValidationError::new(command, spec.name, "valid default literal", reason)
                    })?;
                    values.insert(spec.name, convert(command, spec, &value)?);
                }
            }
        }
    }

    Ok(DecodedArgs { command, values })
}

/// 解码结果
#[derive(Debug, Clone)]
pub struct DecodedArgs {
    command: &'static str,
    values: BTreeMap<&'static str, Arg>,
}

impl DecodedArgs {
    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Arg::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Arg::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Arg::Float(v) => Some(*v),
            Arg::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn f32(&self, name: &str) -> Option<f32> {
        self.float(name).map(|v| v as f32)
    }

    pub fn float_list(&self, name: &str) -> Option<Vec<f64>> {
        match self.get(name)? {
            Arg::FloatList(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn point(&self, name: &str) -> Option<Point> {
        match self.get(name)? {
            Arg::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn points(&self, name: &str) -> Option<Vec<Point>> {
        match self.get(name)? {
            Arg::PointList(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.get(name)? {
            Arg::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Arg::Str(s) | Arg::Enum(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// 外层 None 表示未出现，内层 None 表示显式置空
    pub fn item_ref(&self, name: &str) -> Option<Option<ItemRef>> {
        match self.get(name)? {
            Arg::Ref(r) => Some(Some(r.clone())),
            Arg::Null => Some(None),
            _ => None,
        }
    }

    pub fn any(&self, name: &str) -> Option<AttrValue> {
        match self.get(name)? {
            Arg::Null => Some(AttrValue::None),
            arg => Some(arg.to_value()),
        }
    }

    /// 显式传入了 None
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Arg::Null))
    }
}
