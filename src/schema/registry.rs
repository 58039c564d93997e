//! 全局参数表注册

use super::param::ItemSchema;
use crate::item::ItemKind;
use crate::items;
use crate::value::AttrValue;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

static SCHEMAS: Lazy<HashMap<ItemKind, ItemSchema>> = Lazy::new(|| {
    ItemKind::ALL
        .iter()
        .map(|kind| (*kind, items::schema(*kind)))
        .collect()
});

/// 类型的参数表
pub fn schema_for(kind: ItemKind) -> &'static ItemSchema {
    &SCHEMAS[&kind]
}

/// 参数表的宿主可读形式
pub fn schema_value(kind: ItemKind) -> AttrValue {
    let schema = schema_for(kind);
    let params = schema
        .params
        .iter()
        .map(|p| {
            let mut entry = BTreeMap::new();
            entry.insert("name".to_string(), AttrValue::from(p.name));
            entry.insert("type".to_string(), AttrValue::from(p.ty.name()));
            entry.insert("description".to_string(), AttrValue::from(p.ty.expected()));
            entry.insert(
                "required".to_string(),
                AttrValue::from(p.role == super::ArgRole::Required),
            );
            entry.insert("default".to_string(), AttrValue::from(p.default));
            AttrValue::Map(entry)
        })
        .collect::<Vec<_>>();

    let mut out = BTreeMap::new();
    out.insert("command".to_string(), AttrValue::from(schema.command));
    out.insert("doc".to_string(), AttrValue::from(schema.doc));
    out.insert("kind".to_string(), AttrValue::from(kind.name()));
    out.insert("parameters".to_string(), AttrValue::from(params));
    AttrValue::Map(out)
}
