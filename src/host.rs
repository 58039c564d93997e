//! 宿主调用入口
//!
//! 宿主的每个公开操作都以命令名加无类型参数包调用，返回无类型值或结构化错误。
//! 创建命令（`add_*`、`draw_*`）按条目类型的参数表解码，其余操作也各有一张参数表。

use crate::draw::{render_frame, Backend, FrameStats};
use crate::error::{ItemError, ValidationError};
use crate::item::ItemKind;
use crate::resources::{Font, StyleVar, Theme, ThemeCol, ThemeTarget};
use crate::schema::{decode, schema_value, CommonArgs, DecodeMode, DecodedArgs, ItemSchema, ParamType};
use crate::tree::ItemTree;
use crate::value::{AttrBundle, AttrValue, ItemId, ItemRef};
use once_cell::sync::Lazy;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::trace;

/// 非创建类操作的参数表
static OPERATIONS: Lazy<BTreeMap<&'static str, ItemSchema>> = Lazy::new(|| {
    let item_only = |command: &'static str, doc: &'static str| {
        ItemSchema::builder(command, doc)
            .required("item", ParamType::Ref)
            .build()
    };
    let schemas = vec![
        item_only("get_item_configuration", "Returns an item's configuration."),
        ItemSchema::builder("delete_item", "Deletes an item and all of its children.")
            .required("item", ParamType::Ref)
            .keyword("children_only", ParamType::Bool, "False")
            .build(),
        ItemSchema::builder("move_item", "Moves an item to a new parent and/or position.")
            .required("item", ParamType::Ref)
            .common(CommonArgs::PARENT | CommonArgs::BEFORE)
            .build(),
        item_only("move_item_up", "Moves an item up among its siblings."),
        item_only("move_item_down", "Moves an item down among its siblings."),
        ItemSchema::builder("apply_template", "Copies kind specific values from one item to another of the same kind.")
            .required("source", ParamType::Ref)
            .required("target", ParamType::Ref)
            .build(),
        item_only("get_value", "Returns an item's value."),
        ItemSchema::builder("set_value", "Sets an item's value.")
            .required("item", ParamType::Ref)
            .required("value", ParamType::Any)
            .build(),
        item_only("get_item_info", "Returns an item's kind, parent, children and bindings."),
        item_only("get_item_state", "Returns an item's interaction state."),
        item_only("does_item_exist", "Checks if an item exists."),
        ItemSchema::builder("get_all_items", "Returns all item ids.").build(),
        ItemSchema::builder("get_schema", "Returns the parameter table of a creation command.")
            .required("command", ParamType::Str)
            .build(),
        item_only("push_container_stack", "Pushes a container onto the container stack."),
        ItemSchema::builder("pop_container_stack", "Pops the container stack.").build(),
        ItemSchema::builder("add_theme", "Adds a theme.")
            .keyword("label", ParamType::Str, "''")
            .build(),
        ItemSchema::builder("add_theme_color", "Adds a theme color entry.")
            .required("theme", ParamType::Int)
            .required("col", ParamType::Str)
            .required("color", ParamType::Color)
            .keyword("target", ParamType::Str, "'all'")
            .build(),
        ItemSchema::builder("add_theme_style", "Adds a theme style entry.")
            .required("theme", ParamType::Int)
            .required("var", ParamType::Str)
            .required("x", ParamType::Float)
            .keyword("y", ParamType::Float, "0.0")
            .keyword("target", ParamType::Str, "'all'")
            .build(),
        ItemSchema::builder("delete_theme", "Deletes a theme.")
            .required("theme", ParamType::Int)
            .build(),
        ItemSchema::builder("add_font", "Adds a font, loaded from file when one is given.")
            .keyword("file", ParamType::Str, "''")
            .keyword("size", ParamType::Float, "13.0")
            .positive()
            .keyword("label", ParamType::Str, "'default'")
            .build(),
        ItemSchema::builder("delete_font", "Deletes a font.")
            .required("font", ParamType::Int)
            .build(),
        ItemSchema::builder("bind_item_theme", "Binds a theme to an item, 0 unbinds.")
            .required("item", ParamType::Ref)
            .required("theme", ParamType::Int)
            .build(),
        ItemSchema::builder("bind_item_font", "Binds a font to an item, 0 unbinds.")
            .required("item", ParamType::Ref)
            .required("font", ParamType::Int)
            .build(),
        ItemSchema::builder("bind_kind_theme", "Binds a default theme to every item of a kind, 0 unbinds.")
            .required("kind", ParamType::Str)
            .required("theme", ParamType::Int)
            .build(),
        ItemSchema::builder("bind_font", "Sets the global default font, 0 unbinds.")
            .required("font", ParamType::Int)
            .build(),
    ];
    schemas.into_iter().map(|s| (s.command, s)).collect()
});

/// 宿主接口，拥有条目树
#[derive(Debug, Default)]
pub struct HostApi {
    tree: ItemTree,
}

impl HostApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ItemTree {
        &mut self.tree
    }

    /// 所有可调用的命令名
    pub fn commands() -> Vec<&'static str> {
        let mut commands: Vec<&'static str> = ItemKind::ALL.iter().map(|k| k.command()).collect();
        commands.push("configure_item");
        commands.extend(OPERATIONS.keys().copied());
        commands
    }

    /// 绘制一帧
    pub fn render(&mut self, backend: &mut dyn Backend) -> FrameStats {
        render_frame(&mut self.tree, backend)
    }

    /// 按命令名分发
    pub fn call(&mut self, command: &str, bundle: &AttrBundle) -> Result<AttrValue, ItemError> {
        trace!(command, "host call");
        if let Some(kind) = ItemKind::from_command(command) {
            return self.tree.create(kind, None, None, bundle).map(AttrValue::from);
        }
        if command == "configure_item" {
            return self.configure(bundle);
        }
        let schema = OPERATIONS.get(command).ok_or_else(|| ItemError::UnknownCommand {
            command: command.to_string(),
        })?;
        let args = decode(schema, bundle, DecodeMode::Create)?;
        let tree = &mut self.tree;

        match schema.command {
            "get_item_configuration" => Ok(tree
                .configuration(&item_arg(&args, "item")?)
                .map(AttrValue::Map)
                .unwrap_or_default()),
            "delete_item" => {
                let children_only = args.bool("children_only").unwrap_or(false);
                Ok(tree.delete(&item_arg(&args, "item")?, children_only).into())
            }
            "move_item" => {
                let item = item_arg(&args, "item")?;
                let parent = args.item_ref("parent").flatten();
                let before = args.item_ref("before").flatten();
                tree.move_item(&item, parent, before).map(AttrValue::from)
            }
            "move_item_up" => Ok(tree.move_up(&item_arg(&args, "item")?).into()),
            "move_item_down" => Ok(tree.move_down(&item_arg(&args, "item")?).into()),
            "apply_template" => {
                tree.apply_template(&item_arg(&args, "source")?, &item_arg(&args, "target")?)?;
                Ok(AttrValue::None)
            }
            "get_value" => Ok(tree.value(&item_arg(&args, "item")?).unwrap_or_default()),
            "set_value" => {
                let value = args.any("value").unwrap_or_default();
                tree.set_value(&item_arg(&args, "item")?, &value)?;
                Ok(AttrValue::None)
            }
            "get_item_info" => Ok(tree.info(&item_arg(&args, "item")?).unwrap_or_default()),
            "get_item_state" => Ok(tree.state(&item_arg(&args, "item")?).unwrap_or_default()),
            "does_item_exist" => Ok(tree.exists(&item_arg(&args, "item")?).into()),
            "get_all_items" => Ok(tree.all_items().into()),
            "get_schema" => {
                let name = args.string("command").unwrap_or_default();
                let kind = ItemKind::from_command(&name).ok_or_else(|| {
                    ValidationError::new(command, "command", "a creation command", name.clone())
                })?;
                Ok(schema_value(kind))
            }
            "push_container_stack" => {
                tree.push_container(&item_arg(&args, "item")?)?;
                Ok(true.into())
            }
            "pop_container_stack" => Ok(tree.pop_container().into()),
            "add_theme" => {
                let label = args.string("label").unwrap_or_default();
                Ok(tree.resources.add_theme(Theme::new(&label)).into())
            }
            "add_theme_color" | "add_theme_style" => {
                theme_entry(tree, command, &args)?;
                Ok(AttrValue::None)
            }
            "delete_theme" => Ok(tree.resources.remove_theme(id_arg(&args, "theme")).into()),
            "add_font" => {
                let file = args.string("file").unwrap_or_default();
                let size = args.f32("size").unwrap_or(13.0);
                let label = args.string("label").unwrap_or_default();
                let font = if file.is_empty() {
                    Font::builtin(&label, size)
                } else {
                    Font::from_file(&file, size).map_err(|e| {
                        ValidationError::new(command, "file", "a readable font file", e.to_string())
                    })?
                };
                Ok(tree.resources.add_font(font).into())
            }
            "delete_font" => Ok(tree.resources.remove_font(id_arg(&args, "font")).into()),
            "bind_item_theme" => {
                let theme = nonzero(id_arg(&args, "theme"));
                tree.bind_theme(&item_arg(&args, "item")?, theme)?;
                Ok(AttrValue::None)
            }
            "bind_item_font" => {
                let font = nonzero(id_arg(&args, "font"));
                tree.bind_font(&item_arg(&args, "item")?, font)?;
                Ok(AttrValue::None)
            }
            "bind_kind_theme" => {
                let name = args.string("kind").unwrap_or_default();
                let kind = ItemKind::from_name(&name).ok_or_else(|| {
                    ValidationError::new(command, "kind", "an item kind name", name.clone())
                })?;
                let theme = match nonzero(id_arg(&args, "theme")) {
                    Some(id) => Some(
                        tree.resources
                            .theme(id)
                            .ok_or_else(|| ItemError::unknown(command, id))?,
                    ),
                    None => None,
                };
                tree.resources.bind_kind_theme(kind, theme);
                Ok(AttrValue::None)
            }
            "bind_font" => {
                let font = match nonzero(id_arg(&args, "font")) {
                    Some(id) => Some(
                        tree.resources
                            .font(id)
                            .ok_or_else(|| ItemError::unknown(command, id))?,
                    ),
                    None => None,
                };
                tree.resources.set_default_font(font);
                Ok(AttrValue::None)
            }
            _ => Err(ItemError::UnknownCommand {
                command: command.to_string(),
            }),
        }
    }

    /// JSON 形式的调用：参数为 `{"args": [...], "kwargs": {...}}`，
    /// 返回 `{"ok": 值}` 或 `{"error": {"kind", "message"}}`
    pub fn call_json(&mut self, command: &str, payload: &str) -> String {
        let outcome = parse_bundle(command, payload).and_then(|bundle| self.call(command, &bundle));
        reply_json(&outcome).to_string()
    }

    /// 第一个位置参数或 `item` 关键字指明条目，其余关键字是配置
    fn configure(&mut self, bundle: &AttrBundle) -> Result<AttrValue, ItemError> {
        const COMMAND: &str = "configure_item";
        let mut kwargs = bundle.kwargs.clone();
        let target = match (bundle.args.as_slice(), kwargs.remove("item")) {
            ([value], None) => value.clone(),
            ([], Some(value)) => value,
            ([], None) => {
                return Err(ValidationError::new(COMMAND, "item", "item id or alias", "missing required argument").into())
            }
            _ => {
                return Err(ValidationError::new(
                    COMMAND,
                    "args",
                    "exactly one item",
                    format!("{} positional arguments", bundle.args.len()),
                )
                .into())
            }
        };
        let item = to_ref(COMMAND, &target)?;
        let config = AttrBundle {
            args: Vec::new(),
            kwargs,
        };
        self.tree.configure(&item, &config)?;
        Ok(AttrValue::None)
    }
}

fn to_ref(command: &str, value: &AttrValue) -> Result<ItemRef, ItemError> {
    match value {
        AttrValue::Int(id) if *id > 0 => Ok(ItemRef::Id(ItemId(*id as u64))),
        AttrValue::Str(alias) if !alias.is_empty() => Ok(ItemRef::Alias(alias.clone())),
        other => Err(ValidationError::new(command, "item", "item id or alias", other.describe()).into()),
    }
}

/// 必须给出的条目引用
fn item_arg(args: &DecodedArgs, name: &str) -> Result<ItemRef, ItemError> {
    args.item_ref(name).flatten().ok_or_else(|| {
        ValidationError::new(args.command(), name, "item id or alias", "none").into()
    })
}

fn id_arg(args: &DecodedArgs, name: &str) -> ItemId {
    ItemId(args.int(name).unwrap_or(0).max(0) as u64)
}

fn nonzero(id: ItemId) -> Option<ItemId> {
    (id.raw() != 0).then_some(id)
}

fn theme_entry(tree: &mut ItemTree, command: &str, args: &DecodedArgs) -> Result<(), ItemError> {
    let id = id_arg(args, "theme");
    let theme = tree
        .resources
        .theme(id)
        .ok_or_else(|| ItemError::unknown(command, id))?;
    let target_name = args.string("target").unwrap_or_else(|| "all".to_string());
    let target = ThemeTarget::parse(&target_name).ok_or_else(|| {
        ValidationError::new(command, "target", "'all' or an item kind name", target_name.clone())
    })?;

    if command == "add_theme_color" {
        let name = args.string("col").unwrap_or_default();
        let col = ThemeCol::from_name(&name).ok_or_else(|| {
            ValidationError::new(command, "col", "a theme color name", name.clone())
        })?;
        let color = args.color("color").unwrap_or_default();
        theme.borrow_mut().set_color(target, col, color);
    } else {
        let name = args.string("var").unwrap_or_default();
        let var = StyleVar::from_name(&name).ok_or_else(|| {
            ValidationError::new(command, "var", "a style variable name", name.clone())
        })?;
        let value = [args.f32("x").unwrap_or(0.0), args.f32("y").unwrap_or(0.0)];
        theme.borrow_mut().set_style(target, var, value);
    }
    Ok(())
}

/// 解析 JSON 参数包
pub fn parse_bundle(command: &str, payload: &str) -> Result<AttrBundle, ItemError> {
    serde_json::from_str(payload)
        .map_err(|e| ItemError::Script(format!("{}: malformed arguments: {}", command, e)))
}

/// 调用结果的 JSON 形状
pub fn reply_json(outcome: &Result<AttrValue, ItemError>) -> serde_json::Value {
    match outcome {
        Ok(value) => json!({ "ok": value }),
        Err(e) => json!({
            "error": {
                "kind": e.category(),
                "message": e.to_string(),
            }
        }),
    }
}
