//! 条目树操作测试

use super::{add, plot_scaffold};
use crate::error::ItemError;
use crate::tree::ItemTree;
use crate::value::{AttrBundle, AttrValue, ItemRef};
use crate::ItemKind;

fn error_series_bundle(parent: impl Into<AttrValue>) -> AttrBundle {
    AttrBundle::new()
        .arg(vec![1.0, 2.0])
        .arg(vec![1.0, 2.0])
        .arg(vec![0.1, 0.1])
        .arg(vec![0.1, 0.1])
        .kwarg("horizontal", false)
        .kwarg("parent", parent)
}

fn text(tree: &mut ItemTree, parent: impl Into<AttrValue>, value: &str) -> crate::ItemId {
    add(
        tree,
        ItemKind::Text,
        AttrBundle::new().kwarg("parent", parent).kwarg("default_value", value),
    )
}

#[test]
fn test_create_under_compatible_parent() {
    let mut tree = ItemTree::new();
    let (_, _, axis) = plot_scaffold(&mut tree);
    let series = add(&mut tree, ItemKind::ErrorSeries, error_series_bundle(axis));

    let item = tree.get(series).unwrap();
    assert_eq!(item.parent, Some(axis));
    assert_eq!(tree.get(axis).unwrap().children[0], vec![series]);
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_error_series_under_non_axis_parent() {
    let mut tree = ItemTree::new();
    let (window, plot, _) = plot_scaffold(&mut tree);
    let before = tree.len();

    for parent in [window, plot] {
        let err = tree
            .create(ItemKind::ErrorSeries, None, None, &error_series_bundle(parent))
            .unwrap_err();
        match &err {
            ItemError::IncompatibleParent { acceptable, .. } => {
                assert_eq!(acceptable, &vec![ItemKind::PlotAxis]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("Acceptable parents include: plot axis"));
    }
    assert_eq!(tree.len(), before);
}

#[test]
fn test_non_root_kind_without_parent() {
    let mut tree = ItemTree::new();
    let err = tree
        .create(ItemKind::Text, None, None, &AttrBundle::new())
        .unwrap_err();
    match err {
        ItemError::IncompatibleParent { parent, acceptable, .. } => {
            assert_eq!(parent, "top level");
            assert!(acceptable.contains(&ItemKind::Window));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_window_must_be_top_level() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let err = tree
        .create(ItemKind::Window, Some(ItemRef::Id(window)), None, &AttrBundle::new())
        .unwrap_err();
    assert!(matches!(err, ItemError::RootOnly { .. }));
    assert_eq!(err.category(), "IncompatibleParentError");
    assert_eq!(tree.roots(), &[window]);
}

#[test]
fn test_unknown_parent() {
    let mut tree = ItemTree::new();
    let err = tree
        .create(ItemKind::Text, None, None, &AttrBundle::new().kwarg("parent", "nowhere"))
        .unwrap_err();
    assert!(matches!(err, ItemError::UnknownItem { .. }));
    assert_eq!(err.category(), "UnknownNodeError");
}

#[test]
fn test_before_inserts_in_front_of_sibling() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let a = text(&mut tree, window, "a");
    let c = text(&mut tree, window, "c");
    let b = add(
        &mut tree,
        ItemKind::Text,
        AttrBundle::new().kwarg("before", c).kwarg("default_value", "b"),
    );

    assert_eq!(tree.get(window).unwrap().children[0], vec![a, b, c]);
    assert_eq!(tree.get(b).unwrap().parent, Some(window));
}

#[test]
fn test_before_must_be_sibling_in_slot() {
    let mut tree = ItemTree::new();
    let w1 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let w2 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let other = text(&mut tree, w2, "other");

    let err = tree
        .create(
            ItemKind::Text,
            None,
            None,
            &AttrBundle::new().kwarg("parent", w1).kwarg("before", other),
        )
        .unwrap_err();
    assert!(matches!(err, ItemError::Validation(ref v) if v.parameter == "before"));
    assert!(tree.get(w1).unwrap().children[0].is_empty());
}

#[test]
fn test_move_to_rejecting_parent_keeps_position() {
    let mut tree = ItemTree::new();
    let (window, _, axis) = plot_scaffold(&mut tree);
    let first = add(&mut tree, ItemKind::ErrorSeries, error_series_bundle(axis));
    let second = add(&mut tree, ItemKind::ErrorSeries, error_series_bundle(axis));
    let third = add(&mut tree, ItemKind::ErrorSeries, error_series_bundle(axis));

    let err = tree
        .move_item(&ItemRef::Id(second), Some(ItemRef::Id(window)), None)
        .unwrap_err();
    assert!(matches!(err, ItemError::IncompatibleParent { .. }));

    assert_eq!(tree.get(second).unwrap().parent, Some(axis));
    assert_eq!(tree.get(axis).unwrap().children[0], vec![first, second, third]);
}

#[test]
fn test_move_between_parents() {
    let mut tree = ItemTree::new();
    let w1 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let w2 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let a = text(&mut tree, w1, "a");
    let b = text(&mut tree, w2, "b");

    assert_eq!(
        tree.move_item(&ItemRef::Id(a), None, Some(ItemRef::Id(b))),
        Ok(true)
    );
    assert!(tree.get(w1).unwrap().children[0].is_empty());
    assert_eq!(tree.get(w2).unwrap().children[0], vec![a, b]);
    assert_eq!(tree.get(a).unwrap().parent, Some(w2));
}

#[test]
fn test_move_into_own_subtree_rejected() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let outer = add(&mut tree, ItemKind::Group, AttrBundle::new().kwarg("parent", window));
    let inner = add(&mut tree, ItemKind::Group, AttrBundle::new().kwarg("parent", outer));

    let err = tree
        .move_item(&ItemRef::Id(outer), Some(ItemRef::Id(inner)), None)
        .unwrap_err();
    assert!(matches!(err, ItemError::CyclicMove { .. }));
    assert_eq!(tree.get(outer).unwrap().parent, Some(window));
}

#[test]
fn test_move_unknown_item_is_noop() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    assert_eq!(
        tree.move_item(&ItemRef::Alias("ghost".into()), Some(ItemRef::Id(window)), None),
        Ok(false)
    );
}

#[test]
fn test_move_up_and_down() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let a = text(&mut tree, window, "a");
    let b = text(&mut tree, window, "b");

    assert!(!tree.move_up(&ItemRef::Id(a)));
    assert!(tree.move_up(&ItemRef::Id(b)));
    assert_eq!(tree.get(window).unwrap().children[0], vec![b, a]);
    assert!(tree.move_down(&ItemRef::Id(b)));
    assert_eq!(tree.get(window).unwrap().children[0], vec![a, b]);
    assert!(!tree.move_down(&ItemRef::Id(b)));
}

#[test]
fn test_delete_removes_descendants() {
    let mut tree = ItemTree::new();
    let (window, plot, axis) = plot_scaffold(&mut tree);
    let series = add(
        &mut tree,
        ItemKind::ErrorSeries,
        error_series_bundle(axis).kwarg("tag", "errors"),
    );
    let sibling = text(&mut tree, window, "kept");

    assert!(tree.delete(&ItemRef::Id(plot), false));

    for gone in [plot, axis, series] {
        assert!(!tree.exists(&ItemRef::Id(gone)));
    }
    assert!(!tree.exists(&ItemRef::Alias("errors".into())));
    assert_eq!(tree.get(window).unwrap().children[0], vec![sibling]);
    // 没有残留的父子引用
    for id in tree.all_items() {
        let item = tree.get(id).unwrap();
        for child in item.all_children() {
            assert!(tree.get(child).is_some());
        }
        if let Some(parent) = item.parent {
            assert!(tree.get(parent).is_some());
        }
    }
}

#[test]
fn test_delete_children_only() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    text(&mut tree, window, "a");
    text(&mut tree, window, "b");

    assert!(tree.delete(&ItemRef::Id(window), true));
    assert!(tree.exists(&ItemRef::Id(window)));
    assert!(!tree.get(window).unwrap().has_children());
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_delete_unknown_is_noop() {
    let mut tree = ItemTree::new();
    add(&mut tree, ItemKind::Window, AttrBundle::new());
    assert!(!tree.delete(&ItemRef::Alias("missing".into()), false));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_ids_are_never_reused() {
    let mut tree = ItemTree::new();
    let first = add(&mut tree, ItemKind::Window, AttrBundle::new());
    tree.delete(&ItemRef::Id(first), false);
    let second = add(&mut tree, ItemKind::Window, AttrBundle::new());
    assert!(second > first);
}

#[test]
fn test_aliases() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new().kwarg("tag", "main"));
    assert_eq!(tree.lookup(&ItemRef::Alias("main".into())), Some(window));

    let child = text(&mut tree, "main", "by alias");
    assert_eq!(tree.get(child).unwrap().parent, Some(window));

    let err = tree
        .create(ItemKind::Window, None, None, &AttrBundle::new().kwarg("tag", "main"))
        .unwrap_err();
    assert!(matches!(err, ItemError::AliasInUse { owner, .. } if owner == window));

    // 改名后旧别名释放
    tree.configure(&ItemRef::Id(window), &AttrBundle::new().kwarg("tag", "primary"))
        .unwrap();
    assert_eq!(tree.lookup(&ItemRef::Alias("main".into())), None);
    assert_eq!(tree.lookup(&ItemRef::Alias("primary".into())), Some(window));
    add(&mut tree, ItemKind::Window, AttrBundle::new().kwarg("tag", "main"));
}

#[test]
fn test_container_stack_supplies_default_parent() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    tree.push_container(&ItemRef::Id(window)).unwrap();
    let group = add(&mut tree, ItemKind::Group, AttrBundle::new());
    tree.push_container(&ItemRef::Id(group)).unwrap();
    let inner = add(&mut tree, ItemKind::Button, AttrBundle::new());

    assert_eq!(tree.get(inner).unwrap().parent, Some(group));
    assert_eq!(tree.pop_container(), Some(group));
    let outer = add(&mut tree, ItemKind::Button, AttrBundle::new());
    assert_eq!(tree.get(outer).unwrap().parent, Some(window));

    // 窗口仍然是顶层
    let second = add(&mut tree, ItemKind::Window, AttrBundle::new());
    assert_eq!(tree.roots(), &[window, second]);

    let leaf_err = tree.push_container(&ItemRef::Id(inner)).unwrap_err();
    assert!(matches!(leaf_err, ItemError::Validation(_)));
}

#[test]
fn test_deleted_container_leaves_stack() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    tree.push_container(&ItemRef::Id(window)).unwrap();
    tree.delete(&ItemRef::Id(window), false);
    assert_eq!(tree.container_top(), None);
}

#[test]
fn test_configure_updates_only_present_keys() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let id = text(&mut tree, window, "hello");
    tree.configure(&ItemRef::Id(id), &AttrBundle::new().kwarg("bullet", true))
        .unwrap();

    let config = tree.configuration(&ItemRef::Id(id)).unwrap();
    assert_eq!(config["default_value"], AttrValue::from("hello"));
    assert_eq!(config["bullet"], AttrValue::Bool(true));
}

#[test]
fn test_configure_is_all_or_nothing() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let id = text(&mut tree, window, "hello");

    let bad = AttrBundle::new()
        .kwarg("default_value", "changed")
        .kwarg("bullet", "yes");
    assert!(tree.configure(&ItemRef::Id(id), &bad).is_err());

    let config = tree.configuration(&ItemRef::Id(id)).unwrap();
    assert_eq!(config["default_value"], AttrValue::from("hello"));
}

#[test]
fn test_configure_rejects_structural_keys() {
    let mut tree = ItemTree::new();
    let w1 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let w2 = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let id = text(&mut tree, w1, "x");

    let err = tree
        .configure(&ItemRef::Id(id), &AttrBundle::new().kwarg("parent", w2))
        .unwrap_err();
    assert!(matches!(err, ItemError::Validation(ref v) if v.parameter == "parent"));
    assert_eq!(tree.get(id).unwrap().parent, Some(w1));
}

#[test]
fn test_configure_is_idempotent() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let canvas = add(
        &mut tree,
        ItemKind::Drawlist,
        AttrBundle::new().arg(100).arg(100).kwarg("parent", window),
    );
    let circle = add(
        &mut tree,
        ItemKind::DrawCircle,
        AttrBundle::new().arg(vec![10.0, 10.0]).arg(5.0).kwarg("parent", canvas),
    );
    let bundle = AttrBundle::new()
        .kwarg("radius", 8.0)
        .kwarg("fill", vec![1, 2, 3])
        .kwarg("show", false);

    tree.configure(&ItemRef::Id(circle), &bundle).unwrap();
    let once = tree.configuration(&ItemRef::Id(circle)).unwrap();
    tree.configure(&ItemRef::Id(circle), &bundle).unwrap();
    let twice = tree.configuration(&ItemRef::Id(circle)).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once["radius"], AttrValue::Float(8.0));
}

#[test]
fn test_configuration_reflects_creation_bundle() {
    let mut tree = ItemTree::new();
    let (_, _, axis) = plot_scaffold(&mut tree);
    let id = add(
        &mut tree,
        ItemKind::ErrorSeries,
        error_series_bundle(axis)
            .kwarg("label", "err")
            .kwarg("user_data", vec!["a", "b"]),
    );

    let config = tree.configuration(&ItemRef::Id(id)).unwrap();
    assert_eq!(config["x"], AttrValue::from(vec![1.0, 2.0]));
    assert_eq!(config["negative"], AttrValue::from(vec![0.1, 0.1]));
    assert_eq!(config["horizontal"], AttrValue::Bool(false));
    assert_eq!(config["contribute_to_bounds"], AttrValue::Bool(true));
    assert_eq!(config["label"], AttrValue::from("err"));
    assert_eq!(config["user_data"], AttrValue::from(vec!["a", "b"]));
    assert_eq!(config["tag"], AttrValue::from(""));

    // 写出的配置可以原样再应用
    let mut replay = AttrBundle::new();
    for (name, value) in config {
        if name != "tag" {
            replay = replay.kwarg(&name, value);
        }
    }
    let before = tree.configuration(&ItemRef::Id(id));
    tree.configure(&ItemRef::Id(id), &replay).unwrap();
    assert_eq!(tree.configuration(&ItemRef::Id(id)), before);
}

#[test]
fn test_apply_template() {
    let mut tree = ItemTree::new();
    let (_, _, axis) = plot_scaffold(&mut tree);
    let source = add(
        &mut tree,
        ItemKind::ErrorSeries,
        error_series_bundle(axis).kwarg("horizontal", true).kwarg("label", "source"),
    );
    let target = add(
        &mut tree,
        ItemKind::ErrorSeries,
        AttrBundle::new()
            .arg(vec![5.0])
            .arg(vec![5.0])
            .arg(vec![0.5])
            .arg(vec![0.5])
            .kwarg("parent", axis)
            .kwarg("label", "target"),
    );

    tree.apply_template(&ItemRef::Id(source), &ItemRef::Id(target)).unwrap();
    let config = tree.configuration(&ItemRef::Id(target)).unwrap();
    assert_eq!(config["x"], AttrValue::from(vec![1.0, 2.0]));
    assert_eq!(config["horizontal"], AttrValue::Bool(true));
    // 公共配置与结构不复制
    assert_eq!(config["label"], AttrValue::from("target"));
    assert_eq!(tree.get(target).unwrap().parent, Some(axis));
}

#[test]
fn test_apply_template_kind_mismatch() {
    let mut tree = ItemTree::new();
    let (window, plot, _) = plot_scaffold(&mut tree);
    let err = tree
        .apply_template(&ItemRef::Id(window), &ItemRef::Id(plot))
        .unwrap_err();
    assert!(matches!(
        err,
        ItemError::TemplateMismatch { from_kind: ItemKind::Window, to_kind: ItemKind::Plot, .. }
    ));
}

#[test]
fn test_table_rows_are_renumbered() {
    let mut tree = ItemTree::new();
    let window = add(&mut tree, ItemKind::Window, AttrBundle::new());
    let table = add(&mut tree, ItemKind::Table, AttrBundle::new().kwarg("parent", window));
    let rows: Vec<_> = (0..3)
        .map(|_| add(&mut tree, ItemKind::TableRow, AttrBundle::new().kwarg("parent", table)))
        .collect();

    let row_index = |tree: &ItemTree, id| match tree.info(&ItemRef::Id(id)) {
        Some(AttrValue::Map(info)) => info["row_index"].clone(),
        other => panic!("no info: {:?}", other),
    };
    assert_eq!(row_index(&tree, rows[2]), AttrValue::Int(2));

    tree.delete(&ItemRef::Id(rows[0]), false);
    assert_eq!(row_index(&tree, rows[1]), AttrValue::Int(0));
    assert_eq!(row_index(&tree, rows[2]), AttrValue::Int(1));

    tree.move_up(&ItemRef::Id(rows[2]));
    assert_eq!(row_index(&tree, rows[2]), AttrValue::Int(0));
}

#[test]
fn test_values() {
    let mut tree = ItemTree::new();
    let (window, _, axis) = plot_scaffold(&mut tree);
    let series = add(
        &mut tree,
        ItemKind::LineSeries,
        AttrBundle::new().arg(vec![1.0]).arg(vec![2.0]).kwarg("parent", axis),
    );
    let label = text(&mut tree, window, "before");

    tree.set_value(&ItemRef::Id(series), &AttrValue::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]))
        .unwrap();
    assert_eq!(
        tree.value(&ItemRef::Id(series)),
        Some(AttrValue::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]))
    );

    tree.set_value(&ItemRef::Id(label), &AttrValue::from("after")).unwrap();
    assert_eq!(tree.value(&ItemRef::Id(label)), Some(AttrValue::from("after")));

    // 不带值的类型
    assert_eq!(tree.value(&ItemRef::Id(window)), None);
    assert!(tree.set_value(&ItemRef::Id(window), &AttrValue::from(1)).is_err());
}

#[test]
fn test_info_lists_children_per_slot() {
    let mut tree = ItemTree::new();
    let (_, plot, axis) = plot_scaffold(&mut tree);
    let info = match tree.info(&ItemRef::Id(plot)) {
        Some(AttrValue::Map(info)) => info,
        other => panic!("no info: {:?}", other),
    };
    assert_eq!(info["kind"], AttrValue::from("plot"));
    assert_eq!(info["container"], AttrValue::Bool(true));
    match &info["children"] {
        AttrValue::Map(slots) => {
            assert_eq!(slots["axes"], AttrValue::from(vec![axis]));
            assert_eq!(slots["drawing"], AttrValue::List(Vec::new()));
        }
        other => panic!("children not a map: {:?}", other),
    }
}

/// 每种参数类型的非默认取值，取值与写出配置时的形式一致
fn non_default_value(kind: ItemKind, spec: &crate::schema::ParamSpec) -> AttrValue {
    use crate::schema::{parse_literal, ParamType};
    let point = |x: f64, y: f64| AttrValue::from(vec![x, y]);
    match spec.ty {
        ParamType::Bool => {
            let default = spec.default.and_then(|d| parse_literal(d).ok());
            AttrValue::Bool(default != Some(AttrValue::Bool(true)))
        }
        ParamType::Int => AttrValue::Int(7),
        ParamType::Float => AttrValue::Float(2.5),
        ParamType::FloatList => AttrValue::from(vec![1.5, 2.5]),
        ParamType::IntList => AttrValue::from(vec![1i64, 2]),
        ParamType::Point => point(3.5, 4.5),
        ParamType::PointList => AttrValue::from(vec![point(0.0, 0.0), point(8.0, 0.0), point(4.0, 6.0)]),
        ParamType::Color => AttrValue::from(vec![10i64, 20, 30, 40]),
        ParamType::Str if spec.name == "tag" => AttrValue::from(format!("every_{}", kind.name())),
        ParamType::Str => AttrValue::from("sample"),
        ParamType::Enum(options) => AttrValue::from(options[options.len() - 1]),
        ParamType::Ref => AttrValue::None,
        ParamType::Any => AttrValue::List(vec![AttrValue::from("u"), AttrValue::from(1)]),
    }
}

/// 按兼容规则逐级建出能容纳该类型的父项
fn build_with_parent(tree: &mut ItemTree, kind: ItemKind) -> crate::ItemId {
    let mut bundle = AttrBundle::new();
    for spec in crate::schema::schema_for(kind).required() {
        bundle = bundle.arg(non_default_value(kind, spec));
    }
    if !crate::item::rules::is_root_kind(kind) {
        let parent_kind = crate::item::acceptable_parents(kind)[0];
        let parent = build_with_parent(tree, parent_kind);
        bundle = bundle.kwarg("parent", parent);
    }
    add(tree, kind, bundle)
}

#[test]
fn test_configuration_round_trip_for_every_kind() {
    for kind in ItemKind::ALL {
        let mut tree = ItemTree::new();
        let schema = crate::schema::schema_for(kind);

        let mut bundle = AttrBundle::new();
        let mut expected = Vec::new();
        for spec in &schema.params {
            if spec.ty == crate::schema::ParamType::Ref {
                continue;
            }
            let value = non_default_value(kind, spec);
            bundle = bundle.kwarg(spec.name, value.clone());
            expected.push((spec.name, value));
        }
        if !crate::item::rules::is_root_kind(kind) {
            let parent_kind = crate::item::acceptable_parents(kind)[0];
            let parent = build_with_parent(&mut tree, parent_kind);
            bundle = bundle.kwarg("parent", parent);
        }
        let id = tree
            .create(kind, None, None, &bundle)
            .unwrap_or_else(|e| panic!("{}: {}", kind, e));

        let config = tree.configuration(&ItemRef::Id(id)).unwrap();
        for (name, value) in &expected {
            assert_eq!(config.get(*name), Some(value), "{}: {}", kind, name);
        }

        // 写出的配置再应用一次，状态不变
        let mut replay = AttrBundle::new();
        for (name, value) in config.clone() {
            if name != "tag" {
                replay = replay.kwarg(&name, value);
            }
        }
        tree.configure(&ItemRef::Id(id), &replay)
            .unwrap_or_else(|e| panic!("{}: {}", kind, e));
        assert_eq!(tree.configuration(&ItemRef::Id(id)), Some(config), "{}", kind);
    }
}
