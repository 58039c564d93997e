//! 共享资源：主题与字体
//!
//! 资源以 `Rc` 共享，条目只持有句柄。注册表删除资源时只释放自己的句柄，
//! 仍被条目引用的资源继续存活。

pub mod font;
pub mod theme;

pub use font::{Font, FontError};
pub use theme::{StyleVar, Theme, ThemeCol, ThemeComponent, ThemeEntries, ThemeTarget};

use crate::item::ItemKind;
use crate::value::ItemId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type ThemeHandle = Rc<RefCell<Theme>>;
pub type FontHandle = Rc<Font>;

/// 主题与字体注册表
#[derive(Debug, Default)]
pub struct Resources {
    themes: HashMap<ItemId, ThemeHandle>,
    fonts: HashMap<ItemId, FontHandle>,
    /// 类型级默认主题
    kind_themes: HashMap<ItemKind, ThemeHandle>,
    /// 每帧开始压入的全局字体
    default_font: Option<FontHandle>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_theme(&mut self, theme: Theme) -> ItemId {
        let id = theme.id;
        self.themes.insert(id, Rc::new(RefCell::new(theme)));
        id
    }

    pub fn theme(&self, id: ItemId) -> Option<ThemeHandle> {
        self.themes.get(&id).cloned()
    }

    /// 删除主题，同时解除以它为类型默认主题的绑定
    pub fn remove_theme(&mut self, id: ItemId) -> bool {
        let removed = self.themes.remove(&id).is_some();
        if removed {
            self.kind_themes.retain(|_, theme| theme.borrow().id != id);
        }
        removed
    }

    pub fn add_font(&mut self, font: Font) -> ItemId {
        let id = font.id;
        self.fonts.insert(id, Rc::new(font));
        id
    }

    pub fn font(&self, id: ItemId) -> Option<FontHandle> {
        self.fonts.get(&id).cloned()
    }

    pub fn remove_font(&mut self, id: ItemId) -> bool {
        let removed = self.fonts.remove(&id).is_some();
        if removed && self.default_font.as_ref().map(|f| f.id) == Some(id) {
            self.default_font = None;
        }
        removed
    }

    pub fn bind_kind_theme(&mut self, kind: ItemKind, theme: Option<ThemeHandle>) {
        match theme {
            Some(theme) => {
                self.kind_themes.insert(kind, theme);
            }
            None => {
                self.kind_themes.remove(&kind);
            }
        }
    }

    pub fn kind_theme(&self, kind: ItemKind) -> Option<&ThemeHandle> {
        self.kind_themes.get(&kind)
    }

    pub fn set_default_font(&mut self, font: Option<FontHandle>) {
        self.default_font = font;
    }

    pub fn default_font(&self) -> Option<&FontHandle> {
        self.default_font.as_ref()
    }

    pub fn theme_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.themes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn font_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.fonts.keys().copied().collect();
        ids.sort();
        ids
    }
}
