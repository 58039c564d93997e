//! 条目应用：宿主接口 + 脚本环境

use crate::config::EngineConfig;
use crate::draw::{Backend, FrameStats};
use crate::error::ItemError;
use crate::host::HostApi;
use crate::js::{JsHost, ScriptError};
use crate::resources::Font;
use crate::value::{AttrBundle, AttrValue};
use crate::{Color, Rect};
use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};

/// 条目应用
pub struct ItemApp {
    host: Rc<RefCell<HostApi>>,
    js: JsHost,
    viewport: Option<Viewport>,
}

/// 每帧先用清屏色填满视口，再把整帧裁剪在视口内
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    rect: Rect,
    clear: Color,
}

impl ItemApp {
    pub fn new() -> Result<Self, ScriptError> {
        let host = Rc::new(RefCell::new(HostApi::new()));
        let js = JsHost::new(host.clone())?;
        Ok(Self { host, js, viewport: None })
    }

    /// 按配置创建，配置了默认字体时加载并绑定
    pub fn with_config(config: &EngineConfig) -> Result<Self, ScriptError> {
        let mut app = Self::new()?;
        app.viewport = Some(Viewport {
            rect: config.viewport.rect(),
            clear: config.viewport.clear_color(),
        });
        let font = match &config.default_font.file {
            Some(path) => Font::from_file(path, config.default_font.size).unwrap_or_else(|e| {
                warn!(error = %e, "default font unavailable, using builtin metrics");
                Font::builtin("default", config.default_font.size)
            }),
            None => Font::builtin("default", config.default_font.size),
        };
        {
            let mut host = app.host.borrow_mut();
            let resources = &mut host.tree_mut().resources;
            let id = resources.add_font(font);
            let handle = resources.font(id);
            resources.set_default_font(handle);
        }
        Ok(app)
    }

    /// 加载并运行 JS 代码
    pub fn load_script(&self, code: &str) -> Result<(), ScriptError> {
        self.js.eval(code)?;
        info!(items = self.host.borrow().tree().len(), "script loaded");
        Ok(())
    }

    /// 加载并运行 JS 文件
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        self.js.eval_file(path)?;
        info!(path = %path.display(), items = self.host.borrow().tree().len(), "script file loaded");
        Ok(())
    }

    /// 从 Rust 侧直接调用宿主命令
    pub fn call(&self, command: &str, bundle: &AttrBundle) -> Result<AttrValue, ItemError> {
        let mut host = self.host.try_borrow_mut().map_err(|_| ItemError::Busy {
            command: command.to_string(),
        })?;
        host.call(command, bundle)
    }

    /// 绘制一帧
    pub fn render_frame(&self, backend: &mut dyn Backend) -> Result<FrameStats, ItemError> {
        let mut host = self.host.try_borrow_mut().map_err(|_| ItemError::Busy {
            command: "render_frame".to_string(),
        })?;
        if let Some(viewport) = self.viewport {
            let (min, max) = (viewport.rect.min(), viewport.rect.max());
            backend.rect(min, max, viewport.clear, viewport.clear, 0.0, 0.0);
            backend.push_clip_rect(viewport.rect);
        }
        let stats = host.render(backend);
        if self.viewport.is_some() {
            backend.pop_clip_rect();
        }
        if !stats.faults.is_empty() {
            info!(frame = stats.frame, faults = stats.faults.len(), "frame rendered with faults");
        }
        Ok(stats)
    }

    pub fn host(&self) -> Ref<'_, HostApi> {
        self.host.borrow()
    }

    pub fn js(&self) -> &JsHost {
        &self.js
    }
}
