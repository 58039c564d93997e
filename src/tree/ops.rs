//! 结构修改：创建、配置、移动、删除、模板
//!
//! 每个操作先完成全部校验再修改树，失败时树保持原样。

use super::ItemTree;
use crate::error::{ItemError, ValidationError};
use crate::item::{acceptable_parents, rules, slot_for, Item, ItemKind};
use crate::items::ItemBehavior;
use crate::schema::{decode, schema_for, DecodeMode, DecodedArgs};
use crate::value::{AttrBundle, AttrValue, ItemId, ItemRef};
use tracing::debug;

/// 挂接位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Root {
        before: Option<ItemId>,
    },
    Child {
        parent: ItemId,
        slot: usize,
        before: Option<ItemId>,
    },
}

impl ItemTree {
    /// 创建条目
    ///
    /// 显式给出的 `parent`/`before` 优先于参数包里的同名关键字。
    pub fn create(
        &mut self,
        kind: ItemKind,
        parent: Option<ItemRef>,
        before: Option<ItemRef>,
        bundle: &AttrBundle,
    ) -> Result<ItemId, ItemError> {
        let schema = schema_for(kind);
        let command = schema.command;
        let args = decode(schema, bundle, DecodeMode::Create)?;

        let parent = parent.or_else(|| args.item_ref("parent").flatten());
        let before = before.or_else(|| args.item_ref("before").flatten());
        let alias = args.string("tag").filter(|tag| !tag.is_empty());
        if let Some(alias) = &alias {
            self.check_alias(command, alias, None)?;
        }
        let target = self.target_for(command, kind, parent, before, None)?;

        let mut item = Item::new(kind);
        item.common.apply(&args);
        item.data.apply_args(&args);
        let id = item.id;
        if let Some(alias) = alias {
            self.aliases.insert(alias.clone(), id);
            item.alias = Some(alias);
        }
        self.items.insert(id, item);
        self.attach(id, target);

        debug!(item = %id, kind = %kind, ?target, "created item");
        Ok(id)
    }

    /// 重新配置：只更新出现的关键字，全部转换成功后才写入
    pub fn configure(&mut self, item: &ItemRef, bundle: &AttrBundle) -> Result<(), ItemError> {
        const COMMAND: &str = "configure_item";
        let id = self.resolve(COMMAND, item)?;
        let kind = self.items[&id].kind;
        let args = decode(schema_for(kind), bundle, DecodeMode::Configure)?;

        for structural in ["parent", "before"] {
            if args.contains(structural) {
                return Err(ValidationError::new(
                    COMMAND,
                    structural,
                    "move_item for structural changes",
                    "keyword in configure_item",
                )
                .into());
            }
        }
        let alias = match args.string("tag") {
            Some(tag) if !tag.is_empty() => {
                self.check_alias(COMMAND, &tag, Some(id))?;
                Some(Some(tag))
            }
            Some(_) => Some(None),
            None => None,
        };

        if let Some(alias) = alias {
            self.set_alias(id, alias);
        }
        self.apply(id, &args);
        debug!(item = %id, keys = ?args.names().collect::<Vec<_>>(), "configured item");
        Ok(())
    }

    fn apply(&mut self, id: ItemId, args: &DecodedArgs) {
        if let Some(item) = self.items.get_mut(&id) {
            item.common.apply(args);
            item.data.apply_args(args);
        }
    }

    fn check_alias(&self, command: &str, alias: &str, owner: Option<ItemId>) -> Result<(), ItemError> {
        match self.aliases.get(alias) {
            Some(existing) if Some(*existing) != owner => Err(ItemError::AliasInUse {
                command: command.to_string(),
                alias: alias.to_string(),
                owner: *existing,
            }),
            _ => Ok(()),
        }
    }

    fn set_alias(&mut self, id: ItemId, alias: Option<String>) {
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        if let Some(old) = item.alias.take() {
            self.aliases.remove(&old);
        }
        if let Some(alias) = alias {
            self.aliases.insert(alias.clone(), id);
            item.alias = Some(alias);
        }
    }

    /// 计算挂接位置，`moving` 是正在移动的条目
    pub fn target_for(
        &self,
        command: &str,
        kind: ItemKind,
        parent: Option<ItemRef>,
        before: Option<ItemRef>,
        moving: Option<ItemId>,
    ) -> Result<Target, ItemError> {
        let before = before.map(|r| self.resolve(command, &r)).transpose()?;
        if before.is_some() && before == moving {
            return Err(ValidationError::new(command, "before", "another item", "the item itself").into());
        }
        let explicit_parent = parent.map(|r| self.resolve(command, &r)).transpose()?;
        let parent = match (explicit_parent, before) {
            (Some(parent), _) => Some(parent),
            (None, Some(before)) => self.items.get(&before).and_then(|item| item.parent),
            (None, None) => None,
        };

        if rules::is_root_kind(kind) {
            if parent.is_some() {
                return Err(ItemError::RootOnly {
                    command: command.to_string(),
                });
            }
            if let Some(before) = before {
                if !self.roots.contains(&before) {
                    return Err(ValidationError::new(command, "before", "a top-level item", before.to_string()).into());
                }
            }
            return Ok(Target::Root { before });
        }

        let parent = match parent {
            Some(parent) => parent,
            None if before.is_none() => self
                .container_top()
                .ok_or_else(|| incompatible(command, kind, "top level".to_string()))?,
            None => return Err(incompatible(command, kind, "top level".to_string())),
        };

        if let Some(moving) = moving {
            if self.is_ancestor(moving, parent) {
                return Err(ItemError::CyclicMove {
                    command: command.to_string(),
                    item: moving,
                });
            }
        }

        let parent_item = self
            .items
            .get(&parent)
            .ok_or_else(|| ItemError::unknown(command, parent))?;
        let slot = slot_for(parent_item.kind, kind).ok_or_else(|| {
            incompatible(command, kind, format!("{} {}", parent_item.kind.display_name(), parent))
        })?;
        if let Some(before) = before {
            if !parent_item.children[slot].contains(&before) {
                let slot_name = rules::rules_for(parent_item.kind).slots[slot].name;
                return Err(ValidationError::new(
                    command,
                    "before",
                    format!("an item in the '{}' children of {}", slot_name, parent),
                    before.to_string(),
                )
                .into());
            }
        }
        Ok(Target::Child { parent, slot, before })
    }

    /// 挂到目标位置，`before` 不在目标槽位时追加到末尾
    pub(crate) fn attach(&mut self, id: ItemId, target: Target) {
        match target {
            Target::Root { before } => {
                let index = before
                    .and_then(|b| self.roots.iter().position(|r| *r == b))
                    .unwrap_or(self.roots.len());
                self.roots.insert(index, id);
                if let Some(item) = self.items.get_mut(&id) {
                    item.parent = None;
                }
            }
            Target::Child { parent, slot, before } => {
                if let Some(parent_item) = self.items.get_mut(&parent) {
                    let children = &mut parent_item.children[slot];
                    let index = before
                        .and_then(|b| children.iter().position(|c| *c == b))
                        .unwrap_or(children.len());
                    children.insert(index, id);
                }
                if let Some(item) = self.items.get_mut(&id) {
                    item.parent = Some(parent);
                }
                self.renumber_rows(parent);
            }
        }
    }

    /// 从当前位置摘下，返回原位置（用于恢复）
    pub(crate) fn detach(&mut self, id: ItemId) -> Option<Target> {
        let parent = self.items.get(&id)?.parent;
        match parent {
            None => {
                let index = self.roots.iter().position(|r| *r == id)?;
                self.roots.remove(index);
                Some(Target::Root {
                    before: self.roots.get(index).copied(),
                })
            }
            Some(parent) => {
                let parent_item = self.items.get_mut(&parent)?;
                let (slot, index) = parent_item.position_of(id)?;
                parent_item.children[slot].remove(index);
                let before = parent_item.children[slot].get(index).copied();
                if let Some(item) = self.items.get_mut(&id) {
                    item.parent = None;
                }
                self.renumber_rows(parent);
                Some(Target::Child { parent, slot, before })
            }
        }
    }

    /// 表格行号与行在槽位中的位置保持一致
    fn renumber_rows(&mut self, parent: ItemId) {
        let rows = match self.items.get(&parent) {
            Some(item) if item.kind == ItemKind::Table => item.children[1].clone(),
            _ => return,
        };
        for (index, row) in rows.into_iter().enumerate() {
            if let Some(slot) = self.items.get_mut(&row).and_then(|item| item.data.row_index_mut()) {
                *slot = index;
            }
        }
    }

    /// 移动条目；条目不存在时是空操作并返回 false
    ///
    /// 目标位置先完整校验，校验失败时条目留在原处。
    pub fn move_item(
        &mut self,
        item: &ItemRef,
        parent: Option<ItemRef>,
        before: Option<ItemRef>,
    ) -> Result<bool, ItemError> {
        const COMMAND: &str = "move_item";
        let Some(id) = self.lookup(item) else {
            return Ok(false);
        };
        let kind = self.items[&id].kind;
        let target = self.target_for(COMMAND, kind, parent, before, Some(id))?;
        self.detach(id);
        self.attach(id, target);
        debug!(item = %id, ?target, "moved item");
        Ok(true)
    }

    /// 在同一槽位内与前一个兄弟交换
    pub fn move_up(&mut self, item: &ItemRef) -> bool {
        self.shift(item, -1)
    }

    pub fn move_down(&mut self, item: &ItemRef) -> bool {
        self.shift(item, 1)
    }

    fn shift(&mut self, item: &ItemRef, delta: isize) -> bool {
        let Some(id) = self.lookup(item) else {
            return false;
        };
        let parent = self.items[&id].parent;
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent) => {
                let Some(parent_item) = self.items.get_mut(&parent) else {
                    return false;
                };
                let Some((slot, _)) = parent_item.position_of(id) else {
                    return false;
                };
                &mut parent_item.children[slot]
            }
        };
        let Some(index) = siblings.iter().position(|s| *s == id) else {
            return false;
        };
        let other = index as isize + delta;
        if other < 0 || other as usize >= siblings.len() {
            return false;
        }
        siblings.swap(index, other as usize);
        if let Some(parent) = parent {
            self.renumber_rows(parent);
        }
        true
    }

    /// 删除条目及其全部后代（后序），条目不存在时返回 false
    ///
    /// `children_only` 为真时只清空子项，保留条目本身。
    pub fn delete(&mut self, item: &ItemRef, children_only: bool) -> bool {
        let Some(id) = self.lookup(item) else {
            return false;
        };
        if children_only {
            let children = self.items[&id].all_children();
            for child in children {
                self.remove_subtree(child);
            }
            if let Some(item) = self.items.get_mut(&id) {
                item.children.iter_mut().for_each(Vec::clear);
            }
            debug!(item = %id, "deleted children");
        } else {
            self.detach(id);
            let removed = self.remove_subtree(id);
            debug!(item = %id, removed, "deleted item");
        }
        true
    }

    fn remove_subtree(&mut self, id: ItemId) -> usize {
        let children = match self.items.get(&id) {
            Some(item) => item.all_children(),
            None => return 0,
        };
        let mut removed = 0;
        for child in children {
            removed += self.remove_subtree(child);
        }
        if let Some(item) = self.items.remove(&id) {
            if let Some(alias) = &item.alias {
                self.aliases.remove(alias);
            }
            self.container_stack.retain(|c| *c != id);
            removed += 1;
        }
        removed
    }

    /// 把源条目的专有字段复制到目标条目，两者必须同类型
    pub fn apply_template(&mut self, source: &ItemRef, target: &ItemRef) -> Result<(), ItemError> {
        const COMMAND: &str = "apply_template";
        let from = self.resolve(COMMAND, source)?;
        let to = self.resolve(COMMAND, target)?;
        let (from_kind, to_kind) = (self.items[&from].kind, self.items[&to].kind);
        if from_kind != to_kind {
            return Err(ItemError::TemplateMismatch {
                from_item: from,
                from_kind,
                to_item: to,
                to_kind,
            });
        }
        if from != to {
            let template = self.items[&from].data.clone();
            if let Some(item) = self.items.get_mut(&to) {
                item.data.copy_from(&template);
            }
        }
        debug!(from = %from, to = %to, "applied template");
        Ok(())
    }

    pub fn set_value(&mut self, item: &ItemRef, value: &AttrValue) -> Result<(), ItemError> {
        const COMMAND: &str = "set_value";
        let id = self.resolve(COMMAND, item)?;
        let Some(entry) = self.items.get_mut(&id) else {
            return Err(ItemError::unknown(COMMAND, id));
        };
        if !entry.data.set_value(COMMAND, value)? {
            return Err(ValidationError::new(
                COMMAND,
                "item",
                "an item that carries a value",
                entry.kind.display_name(),
            )
            .into());
        }
        Ok(())
    }

    pub fn push_container(&mut self, item: &ItemRef) -> Result<(), ItemError> {
        const COMMAND: &str = "push_container_stack";
        let id = self.resolve(COMMAND, item)?;
        let kind = self.items[&id].kind;
        if !rules::is_container(kind) {
            return Err(ValidationError::new(COMMAND, "item", "a container item", kind.display_name()).into());
        }
        self.container_stack.push(id);
        Ok(())
    }

    pub fn pop_container(&mut self) -> Option<ItemId> {
        self.container_stack.pop()
    }

    /// 绑定条目主题，None 解除绑定
    pub fn bind_theme(&mut self, item: &ItemRef, theme: Option<ItemId>) -> Result<(), ItemError> {
        const COMMAND: &str = "bind_item_theme";
        let id = self.resolve(COMMAND, item)?;
        let handle = match theme {
            Some(theme) => Some(
                self.resources
                    .theme(theme)
                    .ok_or_else(|| ItemError::unknown(COMMAND, theme))?,
            ),
            None => None,
        };
        if let Some(item) = self.items.get_mut(&id) {
            item.theme = handle;
        }
        Ok(())
    }

    pub fn bind_font(&mut self, item: &ItemRef, font: Option<ItemId>) -> Result<(), ItemError> {
        const COMMAND: &str = "bind_item_font";
        let id = self.resolve(COMMAND, item)?;
        let handle = match font {
            Some(font) => Some(
                self.resources
                    .font(font)
                    .ok_or_else(|| ItemError::unknown(COMMAND, font))?,
            ),
            None => None,
        };
        if let Some(item) = self.items.get_mut(&id) {
            item.font = handle;
        }
        Ok(())
    }
}

fn incompatible(command: &str, kind: ItemKind, parent: String) -> ItemError {
    ItemError::IncompatibleParent {
        command: command.to_string(),
        parent,
        acceptable: acceptable_parents(kind),
    }
}
