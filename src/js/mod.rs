//! QuickJS 引擎绑定

mod host;
mod runtime;

pub use host::JsHost;
pub use runtime::{JsRuntime, ScriptError};
