//! 参数编解码测试

use crate::schema::{decode, parse_literal, schema_for, Arg, DecodeMode};
use crate::value::{AttrBundle, AttrValue, ItemId, ItemRef};
use crate::{Color, ItemKind, Point};

fn pt(x: f64, y: f64) -> AttrValue {
    AttrValue::from(vec![x, y])
}

#[test]
fn test_literal_parsing() {
    assert_eq!(parse_literal("True"), Ok(AttrValue::Bool(true)));
    assert_eq!(parse_literal("False"), Ok(AttrValue::Bool(false)));
    assert_eq!(parse_literal("None"), Ok(AttrValue::None));
    assert_eq!(parse_literal("1.0"), Ok(AttrValue::Float(1.0)));
    assert_eq!(parse_literal("-1"), Ok(AttrValue::Int(-1)));
    assert_eq!(parse_literal("''"), Ok(AttrValue::Str(String::new())));
    assert_eq!(parse_literal("[]"), Ok(AttrValue::List(Vec::new())));
    assert_eq!(
        parse_literal("(255, 255, 255, 255)"),
        Ok(AttrValue::from(vec![255i64, 255, 255, 255]))
    );
    assert!(parse_literal("(1, 2").is_err());
    assert!(parse_literal("maybe").is_err());
}

#[test]
fn test_positional_args_follow_declared_order() {
    let bundle = AttrBundle::new().arg(pt(1.0, 2.0)).arg(pt(3.0, 4.0));
    let args = decode(schema_for(ItemKind::DrawLine), &bundle, DecodeMode::Create).unwrap();

    assert_eq!(args.point("p1"), Some(Point::new(1.0, 2.0)));
    assert_eq!(args.point("p2"), Some(Point::new(3.0, 4.0)));
}

#[test]
fn test_create_fills_keyword_defaults() {
    let bundle = AttrBundle::new().arg(pt(0.0, 0.0)).arg(pt(1.0, 1.0));
    let args = decode(schema_for(ItemKind::DrawRect), &bundle, DecodeMode::Create).unwrap();

    assert_eq!(args.color("color"), Some(Color::WHITE));
    assert_eq!(args.color("fill"), Some(Color::new(0, 0, 0, 0)));
    assert_eq!(args.float("thickness"), Some(1.0));
    assert_eq!(args.bool("show"), Some(true));
    assert!(args.is_null("parent"));
}

#[test]
fn test_configure_only_carries_present_keys() {
    let bundle = AttrBundle::new().kwarg("thickness", 3.0);
    let args = decode(schema_for(ItemKind::DrawRect), &bundle, DecodeMode::Configure).unwrap();

    assert_eq!(args.names().collect::<Vec<_>>(), vec!["thickness"]);
    assert!(!args.contains("color"));
}

#[test]
fn test_configure_rejects_positional_args() {
    let bundle = AttrBundle::new().arg(pt(0.0, 0.0));
    let err = decode(schema_for(ItemKind::DrawRect), &bundle, DecodeMode::Configure).unwrap_err();
    assert_eq!(err.parameter, "args");
}

#[test]
fn test_missing_required_argument() {
    let bundle = AttrBundle::new().arg(AttrValue::from(vec![1.0, 2.0]));
    let err = decode(schema_for(ItemKind::LineSeries), &bundle, DecodeMode::Create).unwrap_err();

    assert_eq!(err.command, "add_line_series");
    assert_eq!(err.parameter, "y");
    assert_eq!(err.got, "missing required argument");
}

#[test]
fn test_unknown_keyword_rejected() {
    let bundle = AttrBundle::new().kwarg("colour", vec![1, 2, 3]);
    let err = decode(schema_for(ItemKind::Text), &bundle, DecodeMode::Create).unwrap_err();

    assert_eq!(err.parameter, "colour");
    assert!(err.expected.contains("default_value"));
}

#[test]
fn test_surplus_and_duplicate_arguments() {
    let surplus = AttrBundle::new().arg(pt(0.0, 0.0)).arg(pt(1.0, 1.0)).arg(pt(2.0, 2.0));
    let err = decode(schema_for(ItemKind::DrawLine), &surplus, DecodeMode::Create).unwrap_err();
    assert_eq!(err.parameter, "args");

    let twice = AttrBundle::new()
        .arg(pt(0.0, 0.0))
        .arg(pt(1.0, 1.0))
        .kwarg("p1", pt(5.0, 5.0));
    let err = decode(schema_for(ItemKind::DrawLine), &twice, DecodeMode::Create).unwrap_err();
    assert_eq!(err.parameter, "p1");
}

#[test]
fn test_type_mismatch_reports_expected_and_got() {
    let bundle = AttrBundle::new()
        .arg(AttrValue::from(vec![AttrValue::from(1.0), AttrValue::from("two")]))
        .arg(AttrValue::from(vec![1.0, 2.0]));
    let err = decode(schema_for(ItemKind::LineSeries), &bundle, DecodeMode::Create).unwrap_err();

    assert_eq!(err.parameter, "x");
    assert!(err.got.contains("two"));
    assert!(!err.expected.is_empty());
}

#[test]
fn test_color_accepts_three_or_four_components() {
    let schema = schema_for(ItemKind::DrawLine);
    let base = AttrBundle::new().arg(pt(0.0, 0.0)).arg(pt(1.0, 1.0));

    let rgb = base.clone().kwarg("color", vec![10, 20, 30]);
    let args = decode(schema, &rgb, DecodeMode::Create).unwrap();
    assert_eq!(args.color("color"), Some(Color::new(10, 20, 30, 255)));

    let rgba = base.clone().kwarg("color", vec![10.0, 20.0, 30.0, 40.0]);
    let args = decode(schema, &rgba, DecodeMode::Create).unwrap();
    assert_eq!(args.color("color"), Some(Color::new(10, 20, 30, 40)));

    let short = base.kwarg("color", vec![10, 20]);
    assert!(decode(schema, &short, DecodeMode::Create).is_err());
}

#[test]
fn test_reference_parameters() {
    let schema = schema_for(ItemKind::Text);

    let by_id = AttrBundle::new().kwarg("parent", 7);
    let args = decode(schema, &by_id, DecodeMode::Create).unwrap();
    assert_eq!(args.item_ref("parent"), Some(Some(ItemRef::Id(ItemId(7)))));

    let by_alias = AttrBundle::new().kwarg("parent", "main");
    let args = decode(schema, &by_alias, DecodeMode::Create).unwrap();
    assert_eq!(args.item_ref("parent"), Some(Some(ItemRef::Alias("main".to_string()))));

    for null in [AttrValue::Int(0), AttrValue::from(""), AttrValue::None] {
        let bundle = AttrBundle::new().kwarg("parent", null);
        let args = decode(schema, &bundle, DecodeMode::Create).unwrap();
        assert_eq!(args.item_ref("parent"), Some(None));
    }

    let negative = AttrBundle::new().kwarg("parent", -3);
    assert!(decode(schema, &negative, DecodeMode::Create).is_err());
}

#[test]
fn test_positive_constraint() {
    let schema = schema_for(ItemKind::Drawlist);
    let zero = AttrBundle::new().arg(0).arg(10);
    let err = decode(schema, &zero, DecodeMode::Create).unwrap_err();
    assert_eq!(err.parameter, "width");
    assert!(err.expected.starts_with("positive"));

    let ok = AttrBundle::new().arg(100).arg(10);
    let args = decode(schema, &ok, DecodeMode::Create).unwrap();
    assert_eq!(args.int("width"), Some(100));
}

#[test]
fn test_int_accepts_integral_float() {
    let schema = schema_for(ItemKind::Drawlist);
    let bundle = AttrBundle::new().arg(100.0).arg(50);
    let args = decode(schema, &bundle, DecodeMode::Create).unwrap();
    assert_eq!(args.get("width"), Some(&Arg::Int(100)));

    let fractional = AttrBundle::new().arg(100.5).arg(50);
    assert!(decode(schema, &fractional, DecodeMode::Create).is_err());
}

#[test]
fn test_enum_parameter() {
    let schema = schema_for(ItemKind::PlotAxis);
    let args = decode(schema, &AttrBundle::new().arg("x"), DecodeMode::Create).unwrap();
    assert_eq!(args.get("axis"), Some(&Arg::Enum("x".to_string())));

    let err = decode(schema, &AttrBundle::new().arg("z"), DecodeMode::Create).unwrap_err();
    assert_eq!(err.parameter, "axis");
}

#[test]
fn test_nullable_keyword() {
    let schema = schema_for(ItemKind::Text);
    let args = decode(schema, &AttrBundle::new(), DecodeMode::Create).unwrap();
    assert!(args.is_null("color"));

    let err = decode(schema, &AttrBundle::new().kwarg("bullet", AttrValue::None), DecodeMode::Create)
        .unwrap_err();
    assert_eq!(err.parameter, "bullet");
}

#[test]
fn test_every_schema_default_parses() {
    // 所有默认值字面量都能转换成声明的类型
    for kind in ItemKind::ALL.iter() {
        let schema = schema_for(*kind);
        let mut bundle = AttrBundle::new();
        for spec in schema.required() {
            let sample = match spec.name {
                "axis" => AttrValue::from("x"),
                "width" | "height" => AttrValue::Int(10),
                "radius" | "size" => AttrValue::Float(1.0),
                "text" => AttrValue::from("t"),
                "points" => AttrValue::from(vec![pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 0.0)]),
                "x" | "y" | "negative" | "positive" => AttrValue::from(vec![1.0]),
                _ => pt(0.0, 0.0),
            };
            bundle = bundle.arg(sample);
        }
        if let Err(e) = decode(schema, &bundle, DecodeMode::Create) {
            panic!("{}: {}", schema.command, e);
        }
    }
}
