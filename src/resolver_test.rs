//! Tests for `resolver`.

use serde_json::json;

use crate::error::SynthError;
use crate::resolver::{PseudoOverrides, Resolver};
use crate::stack::Stack;
use crate::types::{LogicalId, Properties, ResourceHandle, Scope, Value, props};

fn stack_with_function() -> (Stack, ResourceHandle) {
  let mut stack = Stack::new("S");
  let f = stack
    .create_resource(&Scope::root(), "Fn", "Test::Function", Properties::new(), &[])
    .unwrap();
  (stack, f)
}

fn resolve(stack: &Stack, value: &Value) -> crate::error::Result<serde_json::Value> {
  let overrides = PseudoOverrides::default();
  Resolver::new(stack, &overrides).resolve(value, &LogicalId::new("Owner"), "Prop")
}

#[test]
fn literals_pass_through() {
  let (stack, _) = stack_with_function();
  let v = Value::from(json!({ "a": [1, true, null, "s"] }));
  assert_eq!(resolve(&stack, &v).unwrap(), json!({ "a": [1, true, null, "s"] }));
}

#[test]
fn ref_and_getatt_become_intrinsics() {
  let (stack, f) = stack_with_function();
  assert_eq!(resolve(&stack, &f.reference()).unwrap(), json!({ "Ref": "Fn" }));
  assert_eq!(
    resolve(&stack, &f.attribute("Arn")).unwrap(),
    json!({ "Fn::GetAtt": ["Fn", "Arn"] })
  );
}

#[test]
fn pseudo_values_are_symbolic_unless_overridden() {
  let (stack, _) = stack_with_function();
  assert_eq!(
    resolve(&stack, &stack.region()).unwrap(),
    json!({ "Ref": "AWS::Region" })
  );
  assert_eq!(
    resolve(&stack, &stack.account()).unwrap(),
    json!({ "Ref": "AWS::AccountId" })
  );

  let overrides = PseudoOverrides {
    region: Some("eu-west-1".to_string()),
    ..PseudoOverrides::default()
  };
  let resolver = Resolver::new(&stack, &overrides);
  let owner = LogicalId::new("Owner");
  assert_eq!(
    resolver.resolve(&stack.region(), &owner, "Prop").unwrap(),
    json!("eu-west-1")
  );
  assert_eq!(
    resolver.resolve(&stack.account(), &owner, "Prop").unwrap(),
    json!({ "Ref": "AWS::AccountId" })
  );
}

#[test]
fn join_with_tokens_keeps_structure_and_merges_literals() {
  let (stack, f) = stack_with_function();
  let v = Value::concat(["a".into(), "b".into(), f.attribute("Arn"), "c".into()]);
  assert_eq!(
    resolve(&stack, &v).unwrap(),
    json!({ "Fn::Join": ["", ["ab", { "Fn::GetAtt": ["Fn", "Arn"] }, "c"]] })
  );
}

#[test]
fn all_literal_join_folds_to_string() {
  let (stack, _) = stack_with_function();
  let v = Value::join("-", ["a".into(), Value::from(2_i64), true.into()]);
  assert_eq!(resolve(&stack, &v).unwrap(), json!("a-2-true"));
}

#[test]
fn overridden_pseudo_folds_into_literal() {
  let (stack, _) = stack_with_function();
  let overrides = PseudoOverrides {
    region: Some("us-east-1".to_string()),
    ..PseudoOverrides::default()
  };
  let v = Value::concat(["https://api.".into(), stack.region(), ".example.com".into()]);
  let out = Resolver::new(&stack, &overrides)
    .resolve(&v, &LogicalId::new("Owner"), "Prop")
    .unwrap();
  assert_eq!(out, json!("https://api.us-east-1.example.com"));
}

#[test]
fn nested_join_with_same_delimiter_is_flattened() {
  let (stack, f) = stack_with_function();
  let inner = Value::concat(["x".into(), f.reference()]);
  let v = Value::concat(["pre-".into(), inner, "-post".into()]);
  assert_eq!(
    resolve(&stack, &v).unwrap(),
    json!({ "Fn::Join": ["", ["pre-x", { "Ref": "Fn" }, "-post"]] })
  );
}

#[test]
fn nested_join_with_other_delimiter_stays_nested() {
  let (stack, f) = stack_with_function();
  let inner = Value::join(",", ["x".into(), f.reference()]);
  let v = Value::concat(["pre".into(), inner]);
  assert_eq!(
    resolve(&stack, &v).unwrap(),
    json!({ "Fn::Join": ["", ["pre", { "Fn::Join": [",", ["x", { "Ref": "Fn" }]] }]] })
  );
}

#[test]
fn single_and_empty_joins_collapse() {
  let (stack, f) = stack_with_function();
  assert_eq!(
    resolve(&stack, &Value::concat([f.reference()])).unwrap(),
    json!({ "Ref": "Fn" })
  );
  assert_eq!(resolve(&stack, &Value::concat([])).unwrap(), json!(""));
}

#[test]
fn null_in_join_is_invalid_property() {
  let (stack, _) = stack_with_function();
  let err = resolve(&stack, &Value::concat(["a".into(), Value::Null])).unwrap_err();
  assert!(matches!(
    err,
    SynthError::InvalidProperty { ref property, .. } if property == "Prop"
  ));
}

#[test]
fn mapping_in_join_is_invalid_property() {
  let (stack, _) = stack_with_function();
  let mapping = || Value::map([("k", "v".into())]);
  for joined in [
    Value::concat([mapping()]),
    Value::concat(["a".into(), mapping()]),
    Value::concat(["a".into(), Value::list(["b".into()])]),
  ] {
    let err = resolve(&stack, &joined).unwrap_err();
    assert!(
      matches!(err, SynthError::InvalidProperty { ref property, .. } if property == "Prop"),
      "{joined:?} resolved to {err:?}"
    );
  }
}

#[test]
fn scalars_in_join_are_stringified() {
  let (stack, _) = stack_with_function();
  let joined = Value::join("-", ["a".into(), 3_i64.into(), true.into()]);
  assert_eq!(resolve(&stack, &joined).unwrap(), json!("a-3-true"));
}

#[test]
fn missing_target_is_unresolved_reference() {
  let (stack, _) = stack_with_function();
  let mut other = Stack::new("Other");
  let foreign = other
    .create_resource(&Scope::root(), "Foreign", "Test::Function", Properties::new(), &[])
    .unwrap();
  let err = resolve(&stack, &foreign.reference()).unwrap_err();
  assert_eq!(
    err,
    SynthError::UnresolvedReference {
      referrer: LogicalId::new("Owner"),
      target: LogicalId::new("Foreign"),
    }
  );
}

#[test]
fn foreign_target_sharing_a_local_id_is_unresolved() {
  let (stack, local) = stack_with_function();
  let mut other = Stack::new("Other");
  let foreign = other
    .create_resource(&Scope::root(), "Fn", "Test::Function", Properties::new(), &[])
    .unwrap();
  assert_eq!(local.logical_id(), foreign.logical_id());
  assert!(resolve(&stack, &local.reference()).is_ok());
  let err = resolve(&stack, &foreign.attribute("Arn")).unwrap_err();
  assert_eq!(
    err,
    SynthError::UnresolvedReference {
      referrer: LogicalId::new("Owner"),
      target: LogicalId::new("Fn"),
    }
  );
}

#[test]
fn resolve_properties_aggregates_errors() {
  let mut stack = Stack::new("S");
  let mut other = Stack::new("Other");
  let x = other
    .create_resource(&Scope::root(), "X", "T", Properties::new(), &[])
    .unwrap();
  let y = other
    .create_resource(&Scope::root(), "Y", "T", Properties::new(), &[])
    .unwrap();
  let h = stack
    .create_resource(
      &Scope::root(),
      "A",
      "T",
      props([("One", x.reference()), ("Ok", "fine".into()), ("Two", y.attribute("Arn"))]),
      &[],
    )
    .unwrap();
  let overrides = PseudoOverrides::default();
  let node = stack.resource(h.logical_id()).unwrap();
  let err = Resolver::new(&stack, &overrides)
    .resolve_properties(node)
    .unwrap_err();
  assert_eq!(err.into_errors().len(), 2);
}

#[test]
fn resolve_properties_keeps_order() {
  let mut stack = Stack::new("S");
  let h = stack
    .create_resource(
      &Scope::root(),
      "A",
      "T",
      props([("Zeta", Value::from(1_i64)), ("Alpha", Value::from(2_i64))]),
      &[],
    )
    .unwrap();
  let overrides = PseudoOverrides::default();
  let node = stack.resource(h.logical_id()).unwrap();
  let resolved = Resolver::new(&stack, &overrides)
    .resolve_properties(node)
    .unwrap();
  let keys: Vec<&str> = resolved.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["Zeta", "Alpha"]);
}
