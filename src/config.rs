//! 引擎配置（JSON）

use crate::{Color, Rect};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 引擎配置结构
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub default_font: FontConfig,
    /// 日志过滤串，RUST_LOG 优先
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// 入口脚本
    #[serde(default)]
    pub script: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            default_font: FontConfig::default(),
            log_filter: None,
            frames: default_frames(),
            script: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_clear")]
    pub clear_color: [u8; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            clear_color: default_clear(),
        }
    }
}

impl ViewportConfig {
    /// 视口区域，原点在左上角
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b, a] = self.clear_color;
        Color::new(r, g, b, a)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_font_size")]
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            file: None,
            size: default_font_size(),
        }
    }
}

fn default_frames() -> u32 { 1 }
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_clear() -> [u8; 4] { [0, 0, 0, 255] }
fn default_font_size() -> f32 { 13.0 }

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
