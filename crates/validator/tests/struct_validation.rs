//! End-to-end struct validation: nested structs, collections, maps and
//! cross-field rules with the derive.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use tagcheck_validator::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct LoginRequest {
    #[validate(rules = "required,min=5,email")]
    username: String,
    #[validate(rules = "required,min=5")]
    password: String,
}

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct ConfirmRequest {
    #[validate(rules = "required,min=5,email")]
    username: String,
    #[validate(rules = "required,min=5")]
    password: String,
    #[validate(rules = "required,min=5,eqfield=Password")]
    confirm_password: String,
}

#[derive(Inspect, Clone)]
#[validate(rename_all = "PascalCase")]
struct Address {
    #[validate(rules = "required")]
    city: String,
    #[validate(rules = "required")]
    country: String,
}

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct NestedUser {
    #[validate(rules = "required")]
    id: u64,
    #[validate(rules = "required")]
    name: String,
    #[validate(rules = "required")]
    address: Address,
}

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct School {
    #[validate(rules = "required")]
    name: String,
}

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct User {
    #[validate(rules = "required")]
    id: u64,
    #[validate(rules = "required")]
    name: String,
    #[validate(rules = "required,dive")]
    address: Vec<Address>,
    #[validate(rules = "required,dive,required,min=1")]
    hobbies: Vec<String>,
    #[validate(rules = "required,dive,keys,required,min=2,endkeys")]
    schools: HashMap<String, School>,
    #[validate(rules = "required,dive,keys,required,endkeys,required,gt=0")]
    wallet: HashMap<String, i32>,
}

fn empty_address() -> Address {
    Address {
        city: String::new(),
        country: String::new(),
    }
}

fn school(name: &str) -> School {
    School { name: name.into() }
}

fn user() -> User {
    User {
        id: 0,
        name: String::new(),
        address: vec![empty_address(), empty_address()],
        hobbies: vec!["Coding".into()],
        schools: HashMap::from([
            ("SD".to_owned(), school("SD 1 Indonesia")),
            ("SMP".to_owned(), school("")),
            (String::new(), school("")),
        ]),
        wallet: HashMap::from([("BNI".to_owned(), 1), ("BCA".to_owned(), 3)]),
    }
}

// ============================================================================
// FLAT STRUCTS
// ============================================================================

#[test]
fn test_valid_login_has_no_errors() {
    let login = LoginRequest {
        username: "ahmadroni@gmail.com".into(),
        password: "rahasia".into(),
    };
    let errors = Validator::new().validate_struct(&login).unwrap();
    assert!(errors.is_empty(), "{errors}");
}

#[test]
fn test_invalid_login_reports_each_failed_rule() {
    let login = LoginRequest {
        username: "roni".into(),
        password: "roni".into(),
    };
    let errors = Validator::new().validate_struct(&login).unwrap();
    assert_eq!(
        errors.summary(),
        vec![("Username", "min"), ("Username", "email"), ("Password", "min")]
    );

    let first = &errors.errors()[0];
    assert_eq!(first.field, "Username");
    assert_eq!(first.param.as_deref(), Some("5"));
    assert_eq!(first.value.as_deref(), Some("roni"));
}

#[test]
fn test_required_short_circuits_later_rules() {
    let login = LoginRequest {
        username: String::new(),
        password: String::new(),
    };
    let errors = Validator::new().validate_struct(&login).unwrap();
    assert_eq!(
        errors.summary(),
        vec![("Username", "required"), ("Password", "required")]
    );
}

#[test]
fn test_eqfield_against_sibling() {
    let request = ConfirmRequest {
        username: "ahmadroni@gmail.com".into(),
        password: "rahasia".into(),
        confirm_password: "123".into(),
    };
    let errors = Validator::new().validate_struct(&request).unwrap();
    assert_eq!(
        errors.summary(),
        vec![("ConfirmPassword", "min"), ("ConfirmPassword", "eqfield")]
    );
    assert_eq!(errors.errors()[1].param.as_deref(), Some("Password"));
}

// ============================================================================
// NESTING AND COLLECTIONS
// ============================================================================

#[test]
fn test_nested_struct_is_recursed_without_own_rules() {
    let user = NestedUser {
        id: 0,
        name: String::new(),
        address: empty_address(),
    };
    let errors = Validator::new().validate_struct(&user).unwrap();
    assert_eq!(
        errors.summary(),
        vec![
            ("Id", "required"),
            ("Name", "required"),
            ("Address.City", "required"),
            ("Address.Country", "required"),
        ]
    );
    assert_eq!(errors.errors()[2].field, "City");
}

#[test]
fn test_required_struct_enabled_applies_struct_rules() {
    let user = NestedUser {
        id: 1,
        name: "roni".into(),
        address: empty_address(),
    };
    let validator =
        Validator::with_config(ValidatorConfig::new().with_required_struct_enabled(true));
    let errors = validator.validate_struct(&user).unwrap();
    assert_eq!(errors.summary(), vec![("Address", "required")]);
}

#[test]
fn test_collections_and_maps() {
    let errors = Validator::new().validate_struct(&user()).unwrap();
    assert_eq!(
        errors.summary(),
        vec![
            ("Id", "required"),
            ("Name", "required"),
            ("Address[0].City", "required"),
            ("Address[0].Country", "required"),
            ("Address[1].City", "required"),
            ("Address[1].Country", "required"),
            ("Schools[]", "required"),
            ("Schools[].Name", "required"),
            ("Schools[SMP].Name", "required"),
        ]
    );

    let key_error = errors.for_path("Schools[]").next().unwrap();
    assert_eq!(key_error.field, "Schools[]");
}

#[test]
fn test_dive_element_rules() {
    let mut user = user();
    user.id = 1;
    user.name = "roni".into();
    user.address = vec![Address {
        city: "Jakarta".into(),
        country: "Indonesia".into(),
    }];
    user.schools.clear();
    user.schools.insert("S".into(), school("Solo"));
    user.hobbies = vec!["Coding".into(), String::new()];
    user.wallet.insert("BRI".into(), 0);

    let errors = Validator::new().validate_struct(&user).unwrap();
    assert_eq!(
        errors.summary(),
        vec![
            ("Hobbies[1]", "required"),
            ("Schools[S]", "min"),
            ("Wallet[BRI]", "required"),
        ]
    );
}

#[test]
fn test_empty_collection_fails_required() {
    let mut user = user();
    user.id = 1;
    user.name = "roni".into();
    user.address.clear();
    user.hobbies.clear();
    user.schools.clear();
    user.wallet.clear();

    let errors = Validator::new().validate_struct(&user).unwrap();
    assert_eq!(
        errors.summary(),
        vec![
            ("Address", "required"),
            ("Hobbies", "required"),
            ("Schools", "required"),
            ("Wallet", "required"),
        ]
    );
}

// ============================================================================
// DIRECTIVES AND CONFIG
// ============================================================================

#[derive(Inspect)]
#[validate(rename_all = "PascalCase")]
struct Profile {
    #[validate(rules = "omitempty,email")]
    backup_email: String,
    #[validate(rules = "omitempty,min=3,dive,required")]
    tags: Vec<String>,
    #[validate(rules = "omitempty,url")]
    homepage: Option<String>,
    #[validate(rules = "-")]
    ignored: Address,
}

#[test]
fn test_omitempty_skips_zero_values() {
    let profile = Profile {
        backup_email: String::new(),
        tags: Vec::new(),
        homepage: None,
        ignored: empty_address(),
    };
    let errors = Validator::new().validate_struct(&profile).unwrap();
    assert!(errors.is_empty(), "{errors}");
}

#[test]
fn test_omitempty_checks_present_values() {
    let profile = Profile {
        backup_email: "not-an-email".into(),
        tags: vec!["a".into(), String::new()],
        homepage: Some("example.com".into()),
        ignored: empty_address(),
    };
    let errors = Validator::new().validate_struct(&profile).unwrap();
    assert_eq!(
        errors.summary(),
        vec![
            ("BackupEmail", "email"),
            ("Tags", "min"),
            ("Tags[1]", "required"),
            ("Homepage", "url"),
        ]
    );
}

#[test]
fn test_fail_fast_stops_at_first_error() {
    let validator = Validator::with_config(ValidatorConfig::new().with_fail_fast(true));
    let errors = validator.validate_struct(&user()).unwrap();
    assert_eq!(errors.summary(), vec![("Id", "required")]);
}

#[test]
fn test_dive_on_scalar_is_structural() {
    #[derive(Inspect)]
    struct Bad {
        #[validate(rules = "dive,required")]
        count: u32,
    }

    let err = Validator::new().validate_struct(&Bad { count: 1 }).unwrap_err();
    assert_eq!(err.code(), "MALFORMED_TAG");
}

#[test]
fn test_keys_on_sequence_is_structural() {
    let validator = Validator::new();
    let err = validator
        .validate_value(&vec!["", "x"], "dive,keys,required,endkeys,min=5")
        .unwrap_err();
    assert_eq!(err.code(), "MALFORMED_TAG");
    assert!(err.to_string().contains("`keys` used on a sequence"), "{err}");

    let empty: Vec<String> = Vec::new();
    assert!(validator.validate_value(&empty, "dive,keys,required,endkeys,min=1").is_err());
}

#[test]
fn test_check_struct_folds_into_error() {
    let login = LoginRequest {
        username: "roni".into(),
        password: "rahasia".into(),
    };
    let err = Validator::new().check_struct(&login).unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.summary(), vec![("Username", "min"), ("Username", "email")]);
}

#[test]
fn test_error_display_snapshot() {
    let login = LoginRequest {
        username: "roni".into(),
        password: String::new(),
    };
    let errors = Validator::new().validate_struct(&login).unwrap();
    insta::assert_snapshot!(errors.to_string(), @r"
    Validation failed with 3 error(s):
      1. [Username] min: must be at least 5
      2. [Username] email: must be a valid email address
      3. [Password] required: is required
    ");
}
