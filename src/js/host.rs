//! 脚本侧的条目接口
//!
//! 原生侧只暴露三个函数：`__native_call(command, json)`、`__native_commands()`
//! 与 `__native_log(level, message)`。前导脚本在其上构造全局 `items` 对象，
//! 每个命令一个函数，参数为位置参数加末尾可选的关键字对象。
//!
//! 末尾的普通对象字面量按关键字参数处理。`items.kw(obj)` 显式标记关键字参数，
//! `items.arg(value)` 把对象当作位置参数传入，例如 `items.set_value(id, items.arg({ a: 1 }))`。

use super::runtime::{caught, JsRuntime, ScriptError};
use crate::error::ItemError;
use crate::host::{parse_bundle, reply_json, HostApi};
use rquickjs::Function;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, error, info, trace, warn};

const PRELUDE: &str = r#"
(function (global) {
    function Marked(kind, value) {
        this.kind = kind;
        this.value = value;
    }

    function isPlainObject(value) {
        return value !== null && typeof value === 'object' &&
            Object.getPrototypeOf(value) === Object.prototype;
    }

    function invoke(command, argv) {
        var args = Array.prototype.slice.call(argv);
        var kwargs = {};
        if (args.length > 0) {
            var last = args[args.length - 1];
            if (last instanceof Marked && last.kind === 'kw') {
                kwargs = args.pop().value;
            } else if (isPlainObject(last)) {
                kwargs = args.pop();
            }
        }
        args = args.map(function (a) {
            if (a instanceof Marked) {
                if (a.kind === 'kw') {
                    throw new TypeError(command + ': items.kw() must be the last argument');
                }
                return a.value;
            }
            return a;
        });
        var reply = JSON.parse(__native_call(command, JSON.stringify({ args: args, kwargs: kwargs })));
        if (reply.error) {
            var err = new Error(reply.error.message);
            err.name = reply.error.kind;
            throw err;
        }
        return reply.ok;
    }

    var items = {};
    JSON.parse(__native_commands()).forEach(function (command) {
        items[command] = function () { return invoke(command, arguments); };
    });
    items.kw = function (kwargs) { return new Marked('kw', kwargs || {}); };
    items.arg = function (value) { return new Marked('arg', value); };
    global.items = items;

    function logger(level) {
        return function () {
            var parts = [];
            for (var i = 0; i < arguments.length; i++) {
                var a = arguments[i];
                parts.push(typeof a === 'object' && a !== null ? JSON.stringify(a) : String(a));
            }
            __native_log(level, parts.join(' '));
        };
    }
    global.console = {
        log: logger('info'),
        info: logger('info'),
        debug: logger('debug'),
        warn: logger('warn'),
        error: logger('error')
    };
})(globalThis);
"#;

/// 绑定了宿主接口的 JS 环境
pub struct JsHost {
    runtime: JsRuntime,
    host: Rc<RefCell<HostApi>>,
}

impl JsHost {
    pub fn new(host: Rc<RefCell<HostApi>>) -> Result<Self, ScriptError> {
        let runtime = JsRuntime::new()?;
        let js = Self { runtime, host };
        js.register_natives()?;
        js.runtime.eval(PRELUDE)?;
        debug!("script host initialized");
        Ok(js)
    }

    pub fn host(&self) -> &Rc<RefCell<HostApi>> {
        &self.host
    }

    pub fn runtime(&self) -> &JsRuntime {
        &self.runtime
    }

    /// 执行脚本
    pub fn eval(&self, code: &str) -> Result<String, ScriptError> {
        self.runtime.eval(code)
    }

    pub fn eval_file(&self, path: impl AsRef<Path>) -> Result<String, ScriptError> {
        self.runtime.eval_file(path)
    }

    fn register_natives(&self) -> Result<(), ScriptError> {
        let host = self.host.clone();
        self.runtime.with(|ctx| {
            let globals = ctx.globals();

            let call = Function::new(ctx.clone(), move |command: String, payload: String| {
                dispatch(&host, &command, &payload)
            })
            .map_err(|e| caught(&ctx, e))?;
            globals.set("__native_call", call).map_err(|e| caught(&ctx, e))?;

            let commands = Function::new(ctx.clone(), || {
                serde_json::to_string(&HostApi::commands()).unwrap_or_else(|_| "[]".to_string())
            })
            .map_err(|e| caught(&ctx, e))?;
            globals.set("__native_commands", commands).map_err(|e| caught(&ctx, e))?;

            let log = Function::new(ctx.clone(), |level: String, message: String| {
                match level.as_str() {
                    "error" => error!(target: "script", "{}", message),
                    "warn" => warn!(target: "script", "{}", message),
                    "debug" => debug!(target: "script", "{}", message),
                    _ => info!(target: "script", "{}", message),
                }
            })
            .map_err(|e| caught(&ctx, e))?;
            globals.set("__native_log", log).map_err(|e| caught(&ctx, e))?;
            Ok(())
        })
    }
}

/// 处理一次脚本调用
fn dispatch(host: &Rc<RefCell<HostApi>>, command: &str, payload: &str) -> String {
    trace!(command, payload, "native call");
    let outcome = parse_bundle(command, payload).and_then(|bundle| {
        let mut api = host.try_borrow_mut().map_err(|_| ItemError::Busy {
            command: command.to_string(),
        })?;
        api.call(command, &bundle)
    });
    reply_json(&outcome).to_string()
}
