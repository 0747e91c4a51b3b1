//! Tests for the Inspect derive macro - container and field attributes.

use tagcheck_validator::{Inspect, Value};

#[derive(Inspect)]
#[validate(name = "Register", rename_all = "PascalCase")]
struct RegisterRequest {
    #[validate(rules = "required,min=5")]
    username: String,
    #[validate(rules = "required,eqfield=Password", rename = "Confirm")]
    confirm_password: String,
    #[validate(rules = "required")]
    password: String,
    #[validate(skip)]
    #[allow(dead_code)]
    session: Option<u64>,
    r#type: u8,
}

#[derive(Inspect)]
#[validate(rename_all = "camelCase")]
struct Camel {
    first_name: String,
}

fn main() {
    let request = RegisterRequest {
        username: "RONIX".into(),
        confirm_password: "rahasia".into(),
        password: "rahasia".into(),
        session: None,
        r#type: 1,
    };

    let Value::Struct(inspected) = request.inspect() else {
        panic!("derived Inspect must produce a struct");
    };
    assert_eq!(inspected.name(), "Register");
    let names: Vec<_> = inspected.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["Username", "Confirm", "Password", "Type"]);

    let camel = Camel {
        first_name: "roni".into(),
    };
    let Value::Struct(inspected) = camel.inspect() else {
        panic!("derived Inspect must produce a struct");
    };
    assert_eq!(inspected.fields()[0].name(), "firstName");
}
