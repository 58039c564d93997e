//! Mini Items 运行时主程序
//!
//! 用法：`mini-items [config.json] [script.js]`
//! 运行脚本后按配置绘制若干帧到记录型后端，输出最后一帧的绘制命令 JSON。

use mini_items::{EngineConfig, FrameRecorder, ItemApp};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_SCRIPT: &str = include_str!("../../demos/plot.js");

fn main() -> Result<(), String> {
    let mut config_path: Option<PathBuf> = None;
    let mut script_path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        let path = PathBuf::from(arg);
        if path.extension().map_or(false, |ext| ext == "js") {
            script_path = Some(path);
        } else {
            config_path = Some(path);
        }
    }

    let config = match &config_path {
        Some(path) => EngineConfig::from_file(path).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };

    // RUST_LOG 优先，其次配置文件
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info")))
        .map_err(|e| format!("invalid log filter: {}", e))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = ItemApp::with_config(&config).map_err(|e| e.to_string())?;
    match script_path.or_else(|| config.script.clone()) {
        Some(path) => app.load_file(&path).map_err(|e| e.to_string())?,
        None => app.load_script(DEMO_SCRIPT).map_err(|e| e.to_string())?,
    }

    let mut recorder = FrameRecorder::new();
    for _ in 0..config.frames.max(1) {
        recorder.clear();
        let stats = app.render_frame(&mut recorder).map_err(|e| e.to_string())?;
        info!(
            frame = stats.frame,
            drawn = stats.drawn,
            skipped = stats.skipped,
            faults = stats.faults.len(),
            "frame done"
        );
    }

    let json = recorder.to_json().map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
