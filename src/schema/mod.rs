//! 参数表与参数包编解码
//!
//! 每种条目类型声明一张参数表（名字、语义类型、必填或关键字、默认值字面量），
//! 宿主传入的无类型参数包按表校验和转换，读取配置时再按同一张表写回。

pub mod codec;
pub mod literal;
pub mod param;
pub mod registry;

pub use codec::{convert, decode, put, Arg, ConfigMap, DecodeMode, DecodedArgs};
pub use literal::parse_literal;
pub use param::{ArgRole, CommonArgs, ItemSchema, ParamSpec, ParamType, SchemaBuilder};
pub use registry::{schema_for, schema_value};
