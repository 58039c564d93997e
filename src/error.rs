//! 错误类型

use crate::item::ItemKind;
use crate::value::{ItemId, ItemRef};
use thiserror::Error;

/// 参数校验失败：缺失、类型不符、长度不符
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{command}: invalid argument '{parameter}': expected {expected}, got {got}")]
pub struct ValidationError {
    pub command: String,
    pub parameter: String,
    pub expected: String,
    pub got: String,
}

impl ValidationError {
    pub fn new(
        command: &str,
        parameter: &str,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self {
            command: command.to_string(),
            parameter: parameter.to_string(),
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// 条目树操作错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{command}: Incompatible parent ({parent}). Acceptable parents include: {}", kind_list(.acceptable))]
    IncompatibleParent {
        command: String,
        parent: String,
        acceptable: Vec<ItemKind>,
    },

    #[error("{command}: must be a top-level item")]
    RootOnly { command: String },

    #[error("{command}: item {item} not found")]
    UnknownItem { command: String, item: ItemRef },

    #[error("{command}: cannot move item {item} into its own subtree")]
    CyclicMove { command: String, item: ItemId },

    #[error("apply_template: item {from_item} ({from_kind}) and item {to_item} ({to_kind}) differ in kind")]
    TemplateMismatch {
        from_item: ItemId,
        from_kind: ItemKind,
        to_item: ItemId,
        to_kind: ItemKind,
    },

    #[error("{command}: alias '{alias}' is already used by item {owner}")]
    AliasInUse {
        command: String,
        alias: String,
        owner: ItemId,
    },

    #[error("{command}: unknown command")]
    UnknownCommand { command: String },

    #[error("{command}: item tree is busy (frame in progress)")]
    Busy { command: String },

    #[error("script error: {0}")]
    Script(String),
}

impl ItemError {
    pub fn unknown(command: &str, item: impl Into<ItemRef>) -> Self {
        ItemError::UnknownItem {
            command: command.to_string(),
            item: item.into(),
        }
    }

    /// 错误分类名，脚本侧作为 Error.name
    pub fn category(&self) -> &'static str {
        match self {
            ItemError::Validation(_) => "ValidationError",
            ItemError::IncompatibleParent { .. } | ItemError::RootOnly { .. } => {
                "IncompatibleParentError"
            }
            ItemError::UnknownItem { .. } => "UnknownNodeError",
            ItemError::CyclicMove { .. } => "InvalidMoveError",
            ItemError::TemplateMismatch { .. } => "TemplateMismatchError",
            ItemError::AliasInUse { .. } => "AliasError",
            ItemError::UnknownCommand { .. } => "UnknownCommandError",
            ItemError::Busy { .. } => "BusyError",
            ItemError::Script(_) => "ScriptError",
        }
    }
}

fn kind_list(kinds: &[ItemKind]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds
        .iter()
        .map(|k| k.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 单个节点的绘制故障，只影响该节点的子树
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawFault {
    #[error("length of '{field}' is {got}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("needs at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("draw panicked: {0}")]
    Panicked(String),
}

impl DrawFault {
    /// 检查若干序列与第一个序列等长
    pub fn check_lengths(series: &[(&'static str, usize)]) -> Result<(), DrawFault> {
        let Some(&(_, expected)) = series.first() else {
            return Ok(());
        };
        for &(field, got) in &series[1..] {
            if got != expected {
                return Err(DrawFault::LengthMismatch { field, expected, got });
            }
        }
        Ok(())
    }
}
