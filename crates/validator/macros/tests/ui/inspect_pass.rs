//! Tests for the Inspect derive macro - successful cases.

use std::collections::HashMap;

use tagcheck_validator::{Inspect, Validator, Value};

#[derive(Inspect)]
struct Address {
    #[validate(rules = "required")]
    city: String,
    country: Option<String>,
}

#[derive(Inspect)]
struct User {
    #[validate(rules = "required,min=5")]
    name: String,
    #[validate(rules = "required,dive")]
    addresses: Vec<Address>,
    #[validate(rules = "dive,keys,required,endkeys,gte=0")]
    wallet: HashMap<String, i64>,
    primary: Address,
}

fn main() {
    let user = User {
        name: "ronii".into(),
        addresses: vec![Address {
            city: "Jakarta".into(),
            country: None,
        }],
        wallet: HashMap::from([("BCA".to_owned(), 100)]),
        primary: Address {
            city: "Bandung".into(),
            country: Some("ID".into()),
        },
    };

    let Value::Struct(inspected) = user.inspect() else {
        panic!("derived Inspect must produce a struct");
    };
    assert_eq!(inspected.name(), "User");
    assert_eq!(inspected.fields().len(), 4);
    assert_eq!(inspected.fields()[0].name(), "name");
    assert_eq!(inspected.fields()[0].rules(), "required,min=5");
    assert!(inspected.downcast_ref::<User>().is_some());

    let errors = Validator::new().validate_struct(&user).unwrap();
    assert!(errors.is_empty(), "{errors}");
}
