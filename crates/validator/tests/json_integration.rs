//! Validating `serde_json::Value` documents and loading configuration.

use pretty_assertions::assert_eq;
use serde_json::json;
use tagcheck_validator::prelude::*;

#[test]
fn test_json_scalars() {
    let validator = Validator::new();
    assert!(
        validator
            .validate_value(&json!("roni@gmail.com"), "required,email")
            .unwrap()
            .is_empty()
    );
    assert!(validator.validate_value(&json!(42), "gt=40,lt=50").unwrap().is_empty());

    let errors = validator.validate_value(&json!(null), "required").unwrap();
    assert_eq!(errors.summary(), vec![("", "required")]);
}

#[test]
fn test_json_array_dive() {
    let validator = Validator::new();
    let doc = json!(["go", "", "rust"]);
    let errors = validator.validate_value(&doc, "min=1,dive,required,max=3").unwrap();
    assert_eq!(errors.summary(), vec![("[1]", "required"), ("[2]", "max")]);
}

#[test]
fn test_json_object_dive_with_keys() {
    let validator = Validator::new();
    let doc = json!({ "BCA": 3, "BNI": 0, "x": 1 });
    let errors = validator
        .validate_value(&doc, "dive,keys,min=2,endkeys,gt=0")
        .unwrap();
    assert_eq!(errors.summary(), vec![("[BNI]", "gt"), ("[x]", "min")]);
}

#[test]
fn test_json_object_cross_field_with_other() {
    let validator = Validator::new();
    let form = json!({ "password": "rahasia", "confirm": "rahasia" });
    assert!(
        validator
            .validate_value_with(&json!("rahasia"), &form, "eqfield=password")
            .unwrap()
            .is_empty()
    );

    let errors = validator
        .validate_value_with(&json!("salah"), &form, "eqfield=password")
        .unwrap();
    assert_eq!(errors.summary(), vec![("", "eqfield")]);
}

#[test]
fn test_json_object_is_not_a_struct() {
    let err = Validator::new().validate_struct(&json!({ "a": 1 })).unwrap_err();
    assert_eq!(err.code(), "NOT_A_STRUCT");
    assert_eq!(err.to_string(), "expected a struct, found mapping");
}

#[test]
fn test_config_from_json() {
    let config: ValidatorConfig =
        serde_json::from_value(json!({ "fail_fast": true, "allow_override": true })).unwrap();
    let validator = Validator::with_config(config);

    assert!(validator.config().fail_fast);
    let errors = validator.validate_value(&json!(["", ""]), "dive,required").unwrap();
    assert_eq!(errors.len(), 1);
}
