//! 参数声明：类型、角色、默认值

use bitflags::bitflags;

/// 参数语义类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamType {
    Bool,
    Int,
    Float,
    FloatList,
    IntList,
    /// 2 到 4 个数，只取 x、y
    Point,
    PointList,
    /// 3 或 4 个 0-255 分量
    Color,
    Str,
    /// 条目 ID 或别名
    Ref,
    Enum(&'static [&'static str]),
    /// 任意值，原样保存（user_data）
    Any,
}

impl ParamType {
    /// 错误信息中的期望类型描述
    pub fn expected(&self) -> String {
        match self {
            ParamType::Bool => "bool".into(),
            ParamType::Int => "int".into(),
            ParamType::Float => "float".into(),
            ParamType::FloatList => "list of floats".into(),
            ParamType::IntList => "list of ints".into(),
            ParamType::Point => "point (2 to 4 numbers)".into(),
            ParamType::PointList => "list of points".into(),
            ParamType::Color => "color (3 or 4 numbers)".into(),
            ParamType::Str => "string".into(),
            ParamType::Ref => "item id or alias".into(),
            ParamType::Enum(options) => format!("one of [{}]", options.join(", ")),
            ParamType::Any => "any value".into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::FloatList => "float_list",
            ParamType::IntList => "int_list",
            ParamType::Point => "point",
            ParamType::PointList => "point_list",
            ParamType::Color => "color",
            ParamType::Str => "string",
            ParamType::Ref => "ref",
            ParamType::Enum(_) => "enum",
            ParamType::Any => "any",
        }
    }
}

/// 参数角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRole {
    /// 必填，按声明顺序匹配位置参数，也可按名字传
    Required,
    /// 可选关键字参数
    Keyword,
}

/// 单个参数声明
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub role: ArgRole,
    /// 宿主语言写法的默认值字面量
    pub default: Option<&'static str>,
    /// 数值必须 > 0
    pub positive: bool,
    /// 允许 None
    pub nullable: bool,
}

bitflags! {
    /// 公共参数开关
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommonArgs: u16 {
        const TAG = 1 << 0;
        const LABEL = 1 << 1;
        const PARENT = 1 << 2;
        const BEFORE = 1 << 3;
        const SHOW = 1 << 4;
        const ENABLED = 1 << 5;
        const USER_DATA = 1 << 6;
        const WIDTH = 1 << 7;
        const HEIGHT = 1 << 8;
        const POS = 1 << 9;
    }
}

impl CommonArgs {
    /// 绘图图元的公共参数
    pub const DRAWING: CommonArgs = CommonArgs::TAG
        .union(CommonArgs::PARENT)
        .union(CommonArgs::BEFORE)
        .union(CommonArgs::SHOW)
        .union(CommonArgs::USER_DATA);

    /// 普通控件的公共参数
    pub const WIDGET: CommonArgs = CommonArgs::DRAWING
        .union(CommonArgs::LABEL)
        .union(CommonArgs::ENABLED);
}

/// 条目类型的参数表
#[derive(Debug, Clone)]
pub struct ItemSchema {
    pub command: &'static str,
    pub doc: &'static str,
    pub common: CommonArgs,
    pub params: Vec<ParamSpec>,
}

impl ItemSchema {
    pub fn builder(command: &'static str, doc: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: ItemSchema {
                command,
                doc,
                common: CommonArgs::empty(),
                params: Vec::new(),
            },
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// 按声明顺序的必填参数
    pub fn required(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.role == ArgRole::Required)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.params.iter().map(|p| p.name).collect()
    }
}

pub struct SchemaBuilder {
    schema: ItemSchema,
}

impl SchemaBuilder {
    /// 追加公共参数（在专有参数之前声明）
    pub fn common(mut self, flags: CommonArgs) -> Self {
        self.schema.common = flags;
        let table: [(CommonArgs, &'static str, ParamType, &'static str, bool); 10] = [
            (CommonArgs::TAG, "tag", ParamType::Str, "''", false),
            (CommonArgs::LABEL, "label", ParamType::Str, "''", false),
            (CommonArgs::PARENT, "parent", ParamType::Ref, "None", true),
            (CommonArgs::BEFORE, "before", ParamType::Ref, "None", true),
            (CommonArgs::SHOW, "show", ParamType::Bool, "True", false),
            (CommonArgs::ENABLED, "enabled", ParamType::Bool, "True", false),
            (CommonArgs::USER_DATA, "user_data", ParamType::Any, "None", true),
            (CommonArgs::WIDTH, "width", ParamType::Int, "0", false),
            (CommonArgs::HEIGHT, "height", ParamType::Int, "0", false),
            (CommonArgs::POS, "pos", ParamType::Point, "None", true),
        ];
        for (flag, name, ty, default, nullable) in table {
            if flags.contains(flag) {
                self.schema.params.push(ParamSpec {
                    name,
                    ty,
                    role: ArgRole::Keyword,
                    default: Some(default),
                    positive: false,
                    nullable,
                });
            }
        }
        self
    }

    pub fn required(mut self, name: &'static str, ty: ParamType) -> Self {
        self.schema.params.push(ParamSpec {
            name,
            ty,
            role: ArgRole::Required,
            default: None,
            positive: false,
            nullable: false,
        });
        self
    }

    pub fn keyword(mut self, name: &'static str, ty: ParamType, default: &'static str) -> Self {
        self.schema.params.push(ParamSpec {
            name,
            ty,
            role: ArgRole::Keyword,
            default: Some(default),
            positive: false,
            nullable: false,
        });
        self
    }

    /// 最近声明的参数要求正数
    pub fn positive(mut self) -> Self {
        if let Some(last) = self.schema.params.last_mut() {
            last.positive = true;
        }
        self
    }

    /// 最近声明的参数允许 None
    pub fn nullable(mut self) -> Self {
        if let Some(last) = self.schema.params.last_mut() {
            last.nullable = true;
        }
        self
    }

    pub fn build(self) -> ItemSchema {
        self.schema
    }
}
