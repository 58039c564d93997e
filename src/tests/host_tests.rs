//! 宿主命令、脚本桥接与配置测试

use crate::config::EngineConfig;
use crate::draw::{DrawCommand, FrameRecorder};
use crate::host::HostApi;
use crate::js::{JsHost, ScriptError};
use crate::runtime::ItemApp;
use crate::value::{AttrBundle, AttrValue, ItemId, ItemRef};
use crate::ItemKind;
use std::cell::RefCell;
use std::rc::Rc;

fn id_of(value: AttrValue) -> i64 {
    match value {
        AttrValue::Int(id) => id,
        other => panic!("expected id, got {:?}", other),
    }
}

fn map_of(value: AttrValue) -> std::collections::BTreeMap<String, AttrValue> {
    match value {
        AttrValue::Map(map) => map,
        other => panic!("expected map, got {:?}", other),
    }
}

#[test]
fn test_call_creates_and_configures() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new().kwarg("label", "main")).unwrap());
    let text = id_of(
        api.call(
            "add_text",
            &AttrBundle::new().kwarg("parent", window).kwarg("default_value", "a"),
        )
        .unwrap(),
    );

    let reply = api
        .call("configure_item", &AttrBundle::new().arg(text).kwarg("default_value", "b"))
        .unwrap();
    assert_eq!(reply, AttrValue::None);

    let config = map_of(api.call("get_item_configuration", &AttrBundle::new().arg(text)).unwrap());
    assert_eq!(config["default_value"], AttrValue::from("b"));
    assert_eq!(api.call("get_value", &AttrBundle::new().arg(text)).unwrap(), AttrValue::from("b"));
    assert_eq!(api.tree().kind_of(&ItemRef::Id(ItemId(text as u64))), Some(ItemKind::Text));
}

#[test]
fn test_configure_item_by_keyword() {
    let mut api = HostApi::new();
    api.call("add_window", &AttrBundle::new().kwarg("tag", "win")).unwrap();
    api.call(
        "configure_item",
        &AttrBundle::new().kwarg("item", "win").kwarg("label", "renamed"),
    )
    .unwrap();
    let config = map_of(api.call("get_item_configuration", &AttrBundle::new().arg("win")).unwrap());
    assert_eq!(config["label"], AttrValue::from("renamed"));

    let err = api.call("configure_item", &AttrBundle::new().kwarg("label", "x")).unwrap_err();
    assert_eq!(err.category(), "ValidationError");
}

#[test]
fn test_error_categories() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new()).unwrap());
    let cases = [
        ("add_nothing", AttrBundle::new(), "UnknownCommandError"),
        ("add_text", AttrBundle::new().kwarg("parent", 999_999), "UnknownNodeError"),
        (
            "add_error_series",
            AttrBundle::new()
                .arg(vec![1.0])
                .arg(vec![1.0])
                .arg(vec![1.0])
                .arg(vec![1.0])
                .kwarg("parent", window),
            "IncompatibleParentError",
        ),
        ("add_drawlist", AttrBundle::new().arg(-1).arg(10).kwarg("parent", window), "ValidationError"),
        ("apply_template", AttrBundle::new().arg(window).arg(window + 999_999), "UnknownNodeError"),
    ];
    for (command, bundle, category) in cases {
        let err = api.call(command, &bundle).unwrap_err();
        assert_eq!(err.category(), category, "{}", command);
    }
}

#[test]
fn test_structure_commands() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new()).unwrap());
    let group = id_of(api.call("add_group", &AttrBundle::new().kwarg("parent", window)).unwrap());
    let button = id_of(api.call("add_button", &AttrBundle::new().kwarg("parent", window)).unwrap());

    assert_eq!(
        api.call("move_item", &AttrBundle::new().arg(button).kwarg("parent", group)).unwrap(),
        AttrValue::Bool(true)
    );
    let info = map_of(api.call("get_item_info", &AttrBundle::new().arg(button)).unwrap());
    assert_eq!(info["parent"], AttrValue::Int(group));

    assert_eq!(
        api.call("move_item_up", &AttrBundle::new().arg(group)).unwrap(),
        AttrValue::Bool(false)
    );
    assert_eq!(
        api.call("delete_item", &AttrBundle::new().arg(window).kwarg("children_only", true))
            .unwrap(),
        AttrValue::Bool(true)
    );
    assert_eq!(
        api.call("does_item_exist", &AttrBundle::new().arg(button)).unwrap(),
        AttrValue::Bool(false)
    );
    assert_eq!(
        api.call("get_all_items", &AttrBundle::new()).unwrap(),
        AttrValue::from(vec![AttrValue::Int(window)])
    );
    assert_eq!(
        api.call("delete_item", &AttrBundle::new().arg(button)).unwrap(),
        AttrValue::Bool(false)
    );
}

#[test]
fn test_container_stack_commands() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new()).unwrap());
    api.call("push_container_stack", &AttrBundle::new().arg(window)).unwrap();
    let text = id_of(api.call("add_text", &AttrBundle::new()).unwrap());
    assert_eq!(
        api.call("pop_container_stack", &AttrBundle::new()).unwrap(),
        AttrValue::Int(window)
    );
    let info = map_of(api.call("get_item_info", &AttrBundle::new().arg(text)).unwrap());
    assert_eq!(info["parent"], AttrValue::Int(window));
    assert_eq!(api.call("pop_container_stack", &AttrBundle::new()).unwrap(), AttrValue::None);
}

#[test]
fn test_get_schema() {
    let mut api = HostApi::new();
    let schema = map_of(
        api.call("get_schema", &AttrBundle::new().arg("add_error_series"))
            .unwrap(),
    );
    assert_eq!(schema["command"], AttrValue::from("add_error_series"));
    assert_eq!(schema["kind"], AttrValue::from("error_series"));

    let params = match &schema["parameters"] {
        AttrValue::List(params) => params.clone(),
        other => panic!("parameters not a list: {:?}", other),
    };
    let required: Vec<AttrValue> = params
        .into_iter()
        .map(map_of)
        .filter(|p| p["required"] == AttrValue::Bool(true))
        .map(|p| p["name"].clone())
        .collect();
    let expected: Vec<AttrValue> = ["x", "y", "negative", "positive"]
        .into_iter()
        .map(AttrValue::from)
        .collect();
    assert_eq!(required, expected);

    let err = api.call("get_schema", &AttrBundle::new().arg("delete_item")).unwrap_err();
    assert_eq!(err.category(), "ValidationError");
}

#[test]
fn test_theme_and_font_commands() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new()).unwrap());
    let theme = id_of(api.call("add_theme", &AttrBundle::new().kwarg("label", "dark")).unwrap());
    api.call(
        "add_theme_color",
        &AttrBundle::new().arg(theme).arg("window_bg").arg(vec![10, 20, 30]),
    )
    .unwrap();
    api.call(
        "add_theme_style",
        &AttrBundle::new().arg(theme).arg("window_padding").arg(8.0).kwarg("y", 4.0),
    )
    .unwrap();
    api.call("bind_item_theme", &AttrBundle::new().arg(window).arg(theme)).unwrap();

    let font = id_of(api.call("add_font", &AttrBundle::new().kwarg("label", "mono").kwarg("size", 15.0)).unwrap());
    api.call("bind_font", &AttrBundle::new().arg(font)).unwrap();

    let mut recorder = FrameRecorder::new();
    api.render(&mut recorder);
    assert_eq!(recorder.count("push_style_color"), 1);
    assert_eq!(recorder.count("push_style_var"), 1);
    assert_eq!(recorder.ops().first(), Some(&"push_font"));
    assert!(recorder.is_balanced());

    let bad = api
        .call("add_theme_color", &AttrBundle::new().arg(theme).arg("sky").arg(vec![1, 2, 3]))
        .unwrap_err();
    assert_eq!(bad.category(), "ValidationError");

    // 0 解除绑定
    api.call("bind_item_theme", &AttrBundle::new().arg(window).arg(0)).unwrap();
    api.call("bind_font", &AttrBundle::new().arg(0)).unwrap();
    recorder.clear();
    api.render(&mut recorder);
    assert_eq!(recorder.ops(), vec!["begin_window", "end_window"]);

    assert_eq!(
        api.call("delete_theme", &AttrBundle::new().arg(theme)).unwrap(),
        AttrValue::Bool(true)
    );
    let err = api
        .call("bind_item_theme", &AttrBundle::new().arg(window).arg(theme))
        .unwrap_err();
    assert_eq!(err.category(), "UnknownNodeError");
}

#[test]
fn test_bind_kind_theme_command() {
    let mut api = HostApi::new();
    let window = id_of(api.call("add_window", &AttrBundle::new()).unwrap());
    api.call("add_button", &AttrBundle::new().kwarg("parent", window)).unwrap();
    let theme = id_of(api.call("add_theme", &AttrBundle::new()).unwrap());
    api.call(
        "add_theme_color",
        &AttrBundle::new()
            .arg(theme)
            .arg("button")
            .arg(vec![1, 2, 3, 4])
            .kwarg("target", "button"),
    )
    .unwrap();
    api.call("bind_kind_theme", &AttrBundle::new().arg("button").arg(theme)).unwrap();

    let mut recorder = FrameRecorder::new();
    api.render(&mut recorder);
    assert_eq!(recorder.count("push_style_color"), 1);

    let err = api
        .call("bind_kind_theme", &AttrBundle::new().arg("gizmo").arg(theme))
        .unwrap_err();
    assert_eq!(err.category(), "ValidationError");
}

#[test]
fn test_call_json_shapes() {
    let mut api = HostApi::new();
    let ok: serde_json::Value =
        serde_json::from_str(&api.call_json("add_window", r#"{"kwargs": {"label": "w"}}"#)).unwrap();
    assert!(ok["ok"].is_i64());

    let err: serde_json::Value =
        serde_json::from_str(&api.call_json("add_text", r#"{"args": [], "kwargs": {}}"#)).unwrap();
    assert_eq!(err["error"]["kind"], "IncompatibleParentError");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("add_text: Incompatible parent"));

    let malformed: serde_json::Value = serde_json::from_str(&api.call_json("add_window", "{")).unwrap();
    assert_eq!(malformed["error"]["kind"], "ScriptError");
}

#[test]
fn test_script_builds_items() {
    let host = Rc::new(RefCell::new(HostApi::new()));
    let js = JsHost::new(host.clone()).unwrap();
    let result = js
        .eval(
            r#"
            var w = items.add_window({ label: 'main' });
            var p = items.add_plot({ parent: w });
            var y = items.add_plot_axis('y', { parent: p });
            items.add_error_series([1, 2], [3, 4], [0.5, 0.5], [0.5, 0.5], { parent: y, tag: 'err' });
            items.get_item_configuration('err').x.length;
            "#,
        )
        .unwrap();
    assert_eq!(result, "2");
    assert_eq!(host.borrow().tree().len(), 4);

    let mut recorder = FrameRecorder::new();
    host.borrow_mut().render(&mut recorder);
    assert_eq!(recorder.count("plot_error_bars"), 1);
}

#[test]
fn test_script_errors_carry_category() {
    let host = Rc::new(RefCell::new(HostApi::new()));
    let js = JsHost::new(host).unwrap();
    let caught = js
        .eval(
            r#"
            var w = items.add_window();
            var name;
            try {
                items.add_error_series([1], [1], [1], [1], { parent: w });
            } catch (e) {
                name = e.name;
            }
            name;
            "#,
        )
        .unwrap();
    assert_eq!(caught, "IncompatibleParentError");

    let err = js.eval("items.add_text({ parent: 'nowhere' });").unwrap_err();
    assert_eq!(err.name(), "UnknownNodeError");
    assert!(matches!(err, ScriptError::Exception { ref message, .. } if message.contains("nowhere")));

    let thrown = js.eval("throw new TypeError('plain');").unwrap_err();
    assert_eq!(thrown.name(), "TypeError");
}

#[test]
fn test_script_call_while_host_borrowed() {
    let host = Rc::new(RefCell::new(HostApi::new()));
    let js = JsHost::new(host.clone()).unwrap();
    let _guard = host.borrow_mut();
    let err = js.eval("items.add_window();").unwrap_err();
    assert_eq!(err.name(), "BusyError");
}

#[test]
fn test_script_lists_commands() {
    let host = Rc::new(RefCell::new(HostApi::new()));
    let js = JsHost::new(host).unwrap();
    let result = js
        .eval("typeof items.draw_circle + ',' + typeof items.configure_item + ',' + typeof items.nope")
        .unwrap();
    assert_eq!(result, "function,function,undefined");
    assert_eq!(js.eval("console.log('hello', { a: 1 }); 1").unwrap(), "1");
}

#[test]
fn test_app_runs_script_and_renders() {
    let app = ItemApp::with_config(&EngineConfig::default()).unwrap();
    app.load_script(
        r#"
        var w = items.add_window({ label: 'app' });
        items.add_text({ parent: w, default_value: 'hi' });
        "#,
    )
    .unwrap();

    let mut recorder = FrameRecorder::new();
    let stats = app.render_frame(&mut recorder).unwrap();
    assert_eq!(stats.frame, 1);
    assert_eq!(stats.drawn, 2);
    assert_eq!(
        recorder.ops(),
        vec![
            "rect",
            "push_clip_rect",
            "push_font",
            "begin_window",
            "text",
            "end_window",
            "pop_font",
            "pop_clip_rect",
        ]
    );
    // 视口来自配置
    assert_eq!(
        recorder.find("push_clip_rect"),
        Some(&DrawCommand::PushClipRect { rect: crate::Rect::new(0.0, 0.0, 1280.0, 720.0) })
    );
    match recorder.find("rect") {
        Some(DrawCommand::Rect { fill, .. }) => assert_eq!(*fill, crate::Color::new(0, 0, 0, 255)),
        other => panic!("no clear rect: {:?}", other),
    }
    assert!(recorder.is_balanced());

    let id = app.call("add_window", &AttrBundle::new()).unwrap();
    assert!(matches!(id, AttrValue::Int(_)));
    assert_eq!(app.host().tree().roots().len(), 2);
}

#[test]
fn test_app_busy_while_borrowed() {
    let app = ItemApp::new().unwrap();
    let _guard = app.host();
    let err = app.call("add_window", &AttrBundle::new()).unwrap_err();
    assert_eq!(err.category(), "BusyError");
}

#[test]
fn test_config_defaults_and_parsing() {
    let config = EngineConfig::from_json("{}").unwrap();
    assert_eq!(config.frames, 1);
    assert_eq!(config.viewport.width, 1280);
    assert_eq!(config.viewport.height, 720);
    assert_eq!(config.default_font.size, 13.0);
    assert!(config.script.is_none());

    let config = EngineConfig::from_json(
        r#"{
            "viewport": { "width": 640, "clearColor": [1, 2, 3, 4] },
            "defaultFont": { "size": 16 },
            "logFilter": "debug",
            "frames": 3
        }"#,
    )
    .unwrap();
    assert_eq!(config.viewport.width, 640);
    assert_eq!(config.viewport.height, 720);
    assert_eq!(config.viewport.clear_color(), crate::Color::new(1, 2, 3, 4));
    assert_eq!(config.default_font.size, 16.0);
    assert_eq!(config.log_filter.as_deref(), Some("debug"));
    assert_eq!(config.frames, 3);

    assert!(EngineConfig::from_json("{ \"frames\": \"many\" }").is_err());
    assert!(EngineConfig::from_file("/nonexistent/config.json").is_err());
}

#[test]
fn test_ffi_call_and_render() {
    use std::ffi::{CStr, CString};

    let host = crate::mi_host_new();
    let command = CString::new("add_window").unwrap();
    let bundle = CString::new(r#"{"kwargs": {"label": "ffi"}}"#).unwrap();
    let reply = crate::mi_host_call(host, command.as_ptr(), bundle.as_ptr());
    assert!(!reply.is_null());
    let text = unsafe { CStr::from_ptr(reply) }.to_str().unwrap().to_string();
    crate::mi_string_free(reply);
    let reply: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(reply["ok"].is_i64());

    let frame = crate::mi_host_render_json(host);
    assert!(!frame.is_null());
    let text = unsafe { CStr::from_ptr(frame) }.to_str().unwrap().to_string();
    crate::mi_string_free(frame);
    let commands: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(commands[0]["op"], "begin_window");
    assert_eq!(commands[0]["label"], "ffi");

    assert!(crate::mi_host_call(std::ptr::null_mut(), command.as_ptr(), bundle.as_ptr()).is_null());
    crate::mi_host_free(host);
}

#[test]
fn test_script_keyword_and_positional_markers() {
    let host = Rc::new(RefCell::new(HostApi::new()));
    let js = JsHost::new(host).unwrap();
    let result = js
        .eval(
            r#"
            var w = items.add_window();
            var t = items.add_text({ parent: w });
            items.configure_item(t, items.kw({ user_data: { a: 1 } }));
            var message;
            try {
                items.set_value(t, items.arg({ k: 1 }));
            } catch (e) {
                message = e.name + ': ' + e.message;
            }
            items.get_item_configuration(t).user_data.a + '|' + message;
            "#,
        )
        .unwrap();
    // 对象按位置参数传给 value，而不是被当成关键字 k
    assert!(result.starts_with("1|ValidationError: "), "{}", result);
    assert!(result.contains("'value'"), "{}", result);

    let misplaced = js.eval("items.add_window(items.kw({ label: 'x' }), 1);").unwrap_err();
    assert_eq!(misplaced.name(), "TypeError");
}
