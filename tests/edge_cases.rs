use rulesmith::parse::{LexError, MAX_DEPTH, parse};
use rulesmith::{AttributeRecord, EvalError, RuleError, Value, attr, evaluate};
use serde_json::json;

fn record(json: serde_json::Value) -> AttributeRecord {
    AttributeRecord::try_from(&json).unwrap()
}

fn eval_src(source: &str, json: serde_json::Value) -> Result<bool, EvalError> {
    evaluate(&parse(source).unwrap(), &record(json))
}

#[test]
fn whitespace_only_rule_is_a_parse_error() {
    for source in ["", " ", "\t\n", "   \r\n  "] {
        assert!(
            matches!(parse(source), Err(RuleError::Parse(_))),
            "expected parse error for {source:?}"
        );
    }
}

#[test]
fn empty_parens_are_rejected() {
    assert!(matches!(parse("()"), Err(RuleError::Parse(_))));
}

#[test]
fn unterminated_string_reports_quote_offset() {
    match parse("name = 'abc") {
        Err(RuleError::Lex(err)) => {
            assert_eq!(err, LexError::UnterminatedString { offset: 7 });
            assert_eq!(err.ch(), '\'');
        }
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn empty_string_literal() {
    assert_eq!(eval_src("name = ''", json!({"name": ""})), Ok(true));
    assert_eq!(eval_src("name = ''", json!({"name": "x"})), Ok(false));
}

#[test]
fn string_literal_with_keywords_inside() {
    let node = parse("note = 'this AND that OR (other)'").unwrap();
    assert_eq!(node, attr("note").eq("this AND that OR (other)"));
}

#[test]
fn negative_and_float_literals() {
    assert_eq!(eval_src("balance < -10", json!({"balance": -20})), Ok(true));
    assert_eq!(eval_src("ratio >= 0.5", json!({"ratio": 0.75})), Ok(true));
    assert_eq!(eval_src("ratio = 1", json!({"ratio": 1.0})), Ok(true));
}

#[test]
fn numeric_string_in_record_is_coerced() {
    assert_eq!(eval_src("age > 30", json!({"age": "35"})), Ok(true));
    assert_eq!(eval_src("age > 30", json!({"age": " 12.5 "})), Ok(false));
}

#[test]
fn ordering_on_bool_is_a_type_error() {
    let err = eval_src("active > true", json!({"active": true})).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

#[test]
fn null_counts_as_missing() {
    let err = eval_src("age > 30", json!({"age": null})).unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingAttribute {
            attribute: "age".into()
        }
    );
}

#[test]
fn array_value_is_a_type_error() {
    let err = eval_src("tags = 'a'", json!({"tags": ["a"]})).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { found: "array", .. }));
}

#[test]
fn nested_record_attributes() {
    let json = json!({"user": {"profile": {"age": 40}}, "region": "eu"});
    assert_eq!(
        eval_src("user.profile.age >= 18 AND region = 'eu'", json),
        Ok(true)
    );
}

#[test]
fn keywords_are_case_insensitive() {
    let upper = parse("a = 1 AND b = 2 OR c = 3").unwrap();
    let lower = parse("a = 1 and b = 2 or c = 3").unwrap();
    let mixed = parse("a = 1 AnD b = 2 oR c = 3").unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
}

#[test]
fn double_equals_is_accepted() {
    assert_eq!(parse("x == 1").unwrap(), parse("x = 1").unwrap());
}

#[test]
fn huge_integer_becomes_float() {
    let node = parse("x > 99999999999999999999").unwrap();
    assert_eq!(node, attr("x").gt(Value::Float(1e20)));
}

#[test]
fn long_flat_chain_at_depth_limit() {
    let n = MAX_DEPTH + 1;
    let source = (0..n)
        .map(|i| format!("f{i} >= 1"))
        .collect::<Vec<_>>()
        .join(" AND ");
    let node = parse(&source).unwrap();
    assert_eq!(node.leaf_count(), n);
    assert_eq!(node.depth(), MAX_DEPTH);

    let mut rec = AttributeRecord::new();
    for i in 0..n {
        rec.insert(&format!("f{i}"), Value::Int(1));
    }
    assert_eq!(evaluate(&node, &rec), Ok(true));
    assert_eq!(parse(&node.to_string()).unwrap(), node);
    assert!(serde_json::to_string(&node).is_ok());
}

#[test]
fn very_long_chain_is_a_parse_error() {
    // Far past the limit; must be rejected before any recursive walk.
    let source = vec!["a = 1"; 9_000].join(" or ");
    match parse(&source) {
        Err(RuleError::Parse(e)) => {
            assert!(e.message().contains("logical operators nested deeper"), "{e}");
        }
        other => panic!("expected parse error, got {:?}", other.map(|n| n.depth())),
    }
}

#[test]
fn evaluation_does_not_validate_attribute_names() {
    // Any identifier parses; only evaluation discovers it is absent.
    let node = parse("no_such_field = 1").unwrap();
    assert!(matches!(
        evaluate(&node, &AttributeRecord::new()),
        Err(EvalError::MissingAttribute { .. })
    ));
}
