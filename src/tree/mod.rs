//! 条目树
//!
//! 树拥有全部条目：顶层条目在 `roots`，其余条目由父项的子槽引用。
//! 别名、容器栈和共享资源注册表也挂在树上，由宿主接口注入使用。

mod ops;

pub use ops::Target;

use crate::error::ItemError;
use crate::item::{rules, Item, ItemKind};
use crate::resources::Resources;
use crate::schema::{schema_for, CommonArgs, ConfigMap};
use crate::value::{AttrValue, ItemId, ItemRef};
use crate::items::ItemBehavior;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct ItemTree {
    pub(crate) items: HashMap<ItemId, Item>,
    pub(crate) roots: Vec<ItemId>,
    pub(crate) aliases: HashMap<String, ItemId>,
    pub(crate) container_stack: Vec<ItemId>,
    pub resources: Resources,
    /// 已渲染的帧数
    pub(crate) frame: u64,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// 解析引用，不存在时返回 None
    pub fn lookup(&self, item: &ItemRef) -> Option<ItemId> {
        match item {
            ItemRef::Id(id) => self.items.contains_key(id).then_some(*id),
            ItemRef::Alias(alias) => self.aliases.get(alias).copied(),
        }
    }

    /// 解析引用，不存在时返回 UnknownItem
    pub fn resolve(&self, command: &str, item: &ItemRef) -> Result<ItemId, ItemError> {
        self.lookup(item)
            .ok_or_else(|| ItemError::unknown(command, item.clone()))
    }

    pub fn exists(&self, item: &ItemRef) -> bool {
        self.lookup(item).is_some()
    }

    /// 全部条目 ID，按创建顺序
    pub fn all_items(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.items.keys().copied().collect();
        ids.sort();
        ids
    }

    /// 按绘制顺序展开子树（含自身）
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(item) = self.items.get(&next) else {
                continue;
            };
            out.push(next);
            for child in item.all_children().into_iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// `ancestor` 是否是 `id` 自身或其祖先
    pub fn is_ancestor(&self, ancestor: ItemId, id: ItemId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.items.get(&next).and_then(|item| item.parent);
        }
        false
    }

    /// 当前配置，按参数名写出
    pub fn configuration(&self, item: &ItemRef) -> Option<ConfigMap> {
        let item = self.items.get(&self.lookup(item)?)?;
        let schema = schema_for(item.kind);
        let mut out = ConfigMap::new();
        if schema.common.contains(CommonArgs::TAG) {
            out.insert(
                "tag".to_string(),
                AttrValue::from(item.alias.clone().unwrap_or_default()),
            );
        }
        item.common.write(schema.common, &mut out);
        item.data.write_config(&mut out);
        Some(out)
    }

    /// 结构信息：类型、父项、各槽子项、别名、绑定的资源
    pub fn info(&self, item: &ItemRef) -> Option<AttrValue> {
        let item = self.items.get(&self.lookup(item)?)?;
        let mut children = BTreeMap::new();
        for (slot, ids) in rules::rules_for(item.kind).slots.iter().zip(&item.children) {
            children.insert(slot.name.to_string(), AttrValue::from(ids.clone()));
        }

        let mut out = BTreeMap::new();
        out.insert("id".to_string(), AttrValue::from(item.id));
        out.insert("kind".to_string(), AttrValue::from(item.kind.name()));
        out.insert("command".to_string(), AttrValue::from(item.kind.command()));
        out.insert("alias".to_string(), AttrValue::from(item.alias.clone()));
        out.insert("parent".to_string(), AttrValue::from(item.parent));
        out.insert("children".to_string(), AttrValue::Map(children));
        out.insert(
            "theme".to_string(),
            AttrValue::from(item.theme.as_ref().map(|t| t.borrow().id)),
        );
        out.insert(
            "font".to_string(),
            AttrValue::from(item.font.as_ref().map(|f| f.id)),
        );
        out.insert(
            "container".to_string(),
            AttrValue::from(rules::is_container(item.kind)),
        );
        if let crate::items::ItemData::TableRow(row) = &item.data {
            out.insert("row_index".to_string(), AttrValue::from(row.row_index as i64));
        }
        Some(AttrValue::Map(out))
    }

    /// 交互状态；只有在最近一帧被绘制的条目才算可见
    pub fn state(&self, item: &ItemRef) -> Option<AttrValue> {
        let item = self.items.get(&self.lookup(item)?)?;
        let state = &item.state;
        let visible = self.frame > 0 && state.last_frame == self.frame;

        let mut out = BTreeMap::new();
        out.insert("visible".to_string(), AttrValue::from(visible));
        out.insert("hovered".to_string(), AttrValue::from(state.hovered));
        out.insert("active".to_string(), AttrValue::from(state.active));
        out.insert("clicked".to_string(), AttrValue::from(state.clicked));
        out.insert("rect_min".to_string(), AttrValue::from(state.rect.min()));
        out.insert("rect_size".to_string(), AttrValue::from(vec![state.rect.width, state.rect.height]));
        out.insert("last_frame".to_string(), AttrValue::from(state.last_frame as i64));
        Some(AttrValue::Map(out))
    }

    pub fn value(&self, item: &ItemRef) -> Option<AttrValue> {
        let item = self.items.get(&self.lookup(item)?)?;
        item.data.value()
    }

    pub fn kind_of(&self, item: &ItemRef) -> Option<ItemKind> {
        self.lookup(item)
            .and_then(|id| self.items.get(&id))
            .map(|item| item.kind)
    }

    /// 容器栈栈顶，创建时未指定父项就用它
    pub fn container_top(&self) -> Option<ItemId> {
        self.container_stack.last().copied()
    }
}
