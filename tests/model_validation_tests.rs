use campus_lost_found::{
    AppError,
    models::{
        Item, ItemStatus, ItemType, LoginRequest, NewItemRequest, RegisterRequest, Role, User,
    },
    seed,
};
use serde_json::json;

fn validation_message(result: Result<impl std::fmt::Debug, AppError>) -> String {
    match result {
        Err(AppError::Validation(msg)) => msg,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_item_json_uses_type_key_and_camel_case() {
    let item = seed::demo_items().remove(0);

    let json_output = serde_json::to_string(&item).unwrap();

    // The Rust field is item_type; the wire key is "type".
    assert!(
        json_output.contains(r#""type":"lost""#),
        "JSON output must use 'type' key due to #[serde(rename = \"type\")]"
    );
    assert!(!json_output.contains("item_type"));
    assert!(json_output.contains(r#""itemName":"Blue Backpack""#));
    assert!(json_output.contains(r#""status":"pending""#));
    assert!(json_output.contains(r#""date":"2025-03-10""#));
    // No admin has touched it yet.
    assert!(!json_output.contains("adminId"));
}

#[test]
fn test_item_json_includes_admin_id_once_set() {
    let item = seed::demo_items().remove(1);
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["adminId"], "1");
    assert_eq!(value["status"], "verified");
}

#[test]
fn test_new_item_request_from_client_json() {
    let req: NewItemRequest = serde_json::from_value(json!({
        "itemName": "Keys",
        "type": "found",
        "location": "Parking Lot B"
    }))
    .unwrap();

    assert_eq!(req.item_type, ItemType::Found);
    assert_eq!(req.description, "");
    assert!(req.date.is_none());
    assert!(req.contact_info.is_none());
}

#[test]
fn test_unknown_status_is_rejected() {
    let result: Result<ItemStatus, _> = serde_json::from_value(json!("archived"));
    assert!(result.is_err());
}

#[test]
fn test_user_role_serialization() {
    let user = User {
        id: "9".into(),
        name: "Ada".into(),
        email: "ada@u.edu".into(),
        role: Role::Admin,
    };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["role"], "admin");
    assert_eq!(Role::default(), Role::Student);
}

#[test]
fn test_register_request_validation() {
    let base = RegisterRequest {
        name: "Ada".into(),
        email: "ada@u.edu".into(),
        password: "pw".into(),
        confirm_password: Some("pw".into()),
    };
    assert!(base.validate().is_ok());

    let no_name = RegisterRequest {
        name: " ".into(),
        ..base.clone()
    };
    assert_eq!(validation_message(no_name.validate()), "Name is required");

    let mismatch = RegisterRequest {
        confirm_password: Some("other".into()),
        ..base.clone()
    };
    assert_eq!(validation_message(mismatch.validate()), "Passwords do not match");

    let no_email = RegisterRequest {
        email: String::new(),
        ..base
    };
    assert_eq!(validation_message(no_email.validate()), "Email is required");
}

#[test]
fn test_login_request_validation() {
    let missing_password = LoginRequest {
        email: "ada@u.edu".into(),
        password: String::new(),
    };
    assert_eq!(
        validation_message(missing_password.validate()),
        "Password is required"
    );
}

#[test]
fn test_new_item_normalize() {
    let reporter = User {
        id: "2".into(),
        name: "John".into(),
        email: "john@u.edu".into(),
        role: Role::Student,
    };
    let req = NewItemRequest {
        item_name: "Mug".into(),
        location: "Lab".into(),
        ..NewItemRequest::default()
    };

    let normalized = req.clone().normalize(&reporter).unwrap();
    assert_eq!(normalized.contact_info.as_deref(), Some("john@u.edu"));

    let no_name = NewItemRequest {
        item_name: String::new(),
        ..req.clone()
    };
    assert_eq!(
        validation_message(no_name.normalize(&reporter)),
        "Item name is required"
    );

    let blank_contact = NewItemRequest {
        contact_info: Some("  ".into()),
        ..req
    };
    assert_eq!(
        validation_message(blank_contact.normalize(&reporter)),
        "Contact information is required"
    );
}

#[test]
fn test_item_default_is_pending() {
    assert_eq!(Item::default().status, ItemStatus::Pending);
}
