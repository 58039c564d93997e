//! QuickJS 运行时

use rquickjs::{Context, Ctx, Error as JsError, Runtime, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 脚本执行错误
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 脚本抛出的异常
    #[error("{name}: {message}")]
    Exception { name: String, message: String },

    /// 引擎自身的错误（内存、类型转换等）
    #[error("quickjs: {0}")]
    Engine(String),
}

impl ScriptError {
    /// 异常名，非异常错误为 "Error"
    pub fn name(&self) -> &str {
        match self {
            ScriptError::Exception { name, .. } => name,
            _ => "Error",
        }
    }
}

impl From<JsError> for ScriptError {
    fn from(e: JsError) -> Self {
        ScriptError::Engine(e.to_string())
    }
}

/// JS 运行时
pub struct JsRuntime {
    // 必须比 context 活得久
    _runtime: Runtime,
    context: Context,
}

impl JsRuntime {
    pub fn new() -> Result<Self, ScriptError> {
        let runtime = Runtime::new()?;
        let context = Context::full(&runtime)?;
        Ok(Self {
            _runtime: runtime,
            context,
        })
    }

    /// 在上下文中执行闭包
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Ctx) -> R,
    {
        self.context.with(f)
    }

    /// 执行 JS 代码，返回结果的字符串形式
    pub fn eval(&self, code: &str) -> Result<String, ScriptError> {
        self.context.with(|ctx| {
            let result: Result<Value, JsError> = ctx.eval(code);
            match result {
                Ok(val) => Ok(value_to_string(&val)),
                Err(e) => Err(caught(&ctx, e)),
            }
        })
    }

    /// 执行 JS 文件
    pub fn eval_file(&self, path: impl AsRef<Path>) -> Result<String, ScriptError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.eval(&code)
    }
}

/// 把引擎错误转成 ScriptError，异常时取出 name 与 message
pub(crate) fn caught(ctx: &Ctx, error: JsError) -> ScriptError {
    if !matches!(error, JsError::Exception) {
        return error.into();
    }
    let thrown = ctx.catch();
    if let Some(obj) = thrown.as_object() {
        let name: Option<String> = obj.get("name").ok().flatten();
        let message: Option<String> = obj.get("message").ok().flatten();
        return ScriptError::Exception {
            name: name.unwrap_or_else(|| "Error".to_string()),
            message: message.unwrap_or_default(),
        };
    }
    ScriptError::Exception {
        name: "Error".to_string(),
        message: value_to_string(&thrown),
    }
}

/// 将 JS Value 转换为字符串
pub(crate) fn value_to_string(val: &Value) -> String {
    if val.is_undefined() {
        "undefined".to_string()
    } else if val.is_null() {
        "null".to_string()
    } else if let Some(s) = val.as_string() {
        s.to_string().unwrap_or_default()
    } else if let Some(n) = val.as_int() {
        n.to_string()
    } else if let Some(n) = val.as_float() {
        n.to_string()
    } else if let Some(b) = val.as_bool() {
        b.to_string()
    } else {
        "[object]".to_string()
    }
}
