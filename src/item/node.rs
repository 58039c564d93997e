//! 条目节点

use super::kind::ItemKind;
use super::rules;
use crate::draw::ItemInteraction;
use crate::items::ItemData;
use crate::resources::{FontHandle, ThemeHandle};
use crate::schema::{put, CommonArgs, ConfigMap, DecodedArgs};
use crate::value::{AttrValue, ItemId};
use crate::{Point, Rect, Size};
use serde::Serialize;

/// 所有类型共有的配置
#[derive(Debug, Clone, PartialEq)]
pub struct CommonConfig {
    pub label: String,
    pub show: bool,
    pub enabled: bool,
    pub user_data: AttrValue,
    pub width: i64,
    pub height: i64,
    pub pos: Option<Point>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            show: true,
            enabled: true,
            user_data: AttrValue::None,
            width: 0,
            height: 0,
            pos: None,
        }
    }
}

impl CommonConfig {
    /// 更新出现的公共参数，tag/parent/before 由树处理
    pub fn apply(&mut self, args: &DecodedArgs) {
        if let Some(label) = args.string("label") {
            self.label = label;
        }
        if let Some(show) = args.bool("show") {
            self.show = show;
        }
        if let Some(enabled) = args.bool("enabled") {
            self.enabled = enabled;
        }
        if let Some(user_data) = args.any("user_data") {
            self.user_data = user_data;
        }
        if let Some(width) = args.int("width") {
            self.width = width;
        }
        if let Some(height) = args.int("height") {
            self.height = height;
        }
        if args.contains("pos") {
            self.pos = args.point("pos");
        }
    }

    /// 写出该类型声明过的公共参数
    pub fn write(&self, flags: CommonArgs, out: &mut ConfigMap) {
        if flags.contains(CommonArgs::LABEL) {
            put(out, "label", self.label.as_str());
        }
        if flags.contains(CommonArgs::SHOW) {
            put(out, "show", self.show);
        }
        if flags.contains(CommonArgs::ENABLED) {
            put(out, "enabled", self.enabled);
        }
        if flags.contains(CommonArgs::USER_DATA) {
            put(out, "user_data", self.user_data.clone());
        }
        if flags.contains(CommonArgs::WIDTH) {
            put(out, "width", self.width);
        }
        if flags.contains(CommonArgs::HEIGHT) {
            put(out, "height", self.height);
        }
        if flags.contains(CommonArgs::POS) {
            put(out, "pos", self.pos);
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// 对外可见的交互状态，每个可见节点每帧绘制后更新一次
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ItemState {
    pub hovered: bool,
    pub active: bool,
    pub clicked: bool,
    pub rect: Rect,
    /// 最近一次被绘制的帧号，0 表示从未绘制
    pub last_frame: u64,
}

impl ItemState {
    pub fn record(&mut self, interaction: ItemInteraction, frame: u64) {
        self.hovered = interaction.hovered;
        self.active = interaction.active;
        self.clicked = interaction.clicked;
        self.rect = interaction.rect;
        self.last_frame = frame;
    }
}

/// 树中的一个条目
///
/// 子项按槽位分组，顺序即绘制顺序。`parent` 只用于查找，所有权在父项的槽位里。
#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub alias: Option<String>,
    pub common: CommonConfig,
    pub data: ItemData,
    pub theme: Option<ThemeHandle>,
    pub font: Option<FontHandle>,
    pub parent: Option<ItemId>,
    pub children: Vec<Vec<ItemId>>,
    pub state: ItemState,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            id: ItemId::next(),
            kind,
            alias: None,
            common: CommonConfig::default(),
            data: ItemData::new(kind),
            theme: None,
            font: None,
            parent: None,
            children: vec![Vec::new(); rules::slot_count(kind)],
            state: ItemState::default(),
        }
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(|slot| !slot.is_empty())
    }

    /// 按槽位顺序展开的全部子项
    pub fn all_children(&self) -> Vec<ItemId> {
        self.children.iter().flatten().copied().collect()
    }

    /// 子项所在槽位与位置
    pub fn position_of(&self, child: ItemId) -> Option<(usize, usize)> {
        self.children
            .iter()
            .enumerate()
            .find_map(|(slot, ids)| ids.iter().position(|id| *id == child).map(|pos| (slot, pos)))
    }
}
