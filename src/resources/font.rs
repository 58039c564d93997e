//! 字体资源

use crate::value::ItemId;
use fontdue::FontSettings;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse font {name}: {reason}")]
    Parse { name: String, reason: String },
}

/// 字体：名字、字号，从文件加载时带有解析后的字形数据
pub struct Font {
    pub id: ItemId,
    pub name: String,
    pub size: f32,
    face: Option<fontdue::Font>,
}

impl Font {
    /// 后端内置字体，不带字形数据
    pub fn builtin(name: &str, size: f32) -> Self {
        Self {
            id: ItemId::next(),
            name: name.to_string(),
            size,
            face: None,
        }
    }

    /// 从字体数据创建
    pub fn from_bytes(name: &str, data: &[u8], size: f32) -> Result<Self, FontError> {
        let settings = FontSettings {
            scale: size,
            ..Default::default()
        };
        let face = fontdue::Font::from_bytes(data, settings).map_err(|e| FontError::Parse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            id: ItemId::next(),
            name: name.to_string(),
            size,
            face: Some(face),
        })
    }

    /// 从文件路径加载字体
    pub fn from_file(path: &str, size: f32) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_string(),
            source,
        })?;
        let name = std::path::Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path);
        Self::from_bytes(name, &data, size)
    }

    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }

    /// 行高；内置字体按字号的 1.2 倍估算
    pub fn line_height(&self) -> f32 {
        self.face
            .as_ref()
            .and_then(|f| f.horizontal_line_metrics(self.size))
            .map(|m| m.new_line_size)
            .unwrap_or(self.size * 1.2)
    }

    /// 文本宽度；内置字体按半个字号一个字符估算
    pub fn measure(&self, text: &str) -> f32 {
        match &self.face {
            Some(face) => text
                .chars()
                .map(|ch| face.metrics(ch, self.size).advance_width)
                .sum(),
            None => text.chars().count() as f32 * self.size * 0.5,
        }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("has_face", &self.face.is_some())
            .finish()
    }
}
