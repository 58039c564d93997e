//! 应用运行时

mod app;

pub use app::ItemApp;
