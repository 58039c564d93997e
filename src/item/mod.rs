//! 条目模型：类型标签、兼容规则、节点

pub mod kind;
pub mod node;
pub mod rules;

pub use kind::ItemKind;
pub use node::{CommonConfig, Item, ItemState};
pub use rules::{acceptable_parents, rules_for, slot_for, ChildSlot, KindRules, ParentRule};
