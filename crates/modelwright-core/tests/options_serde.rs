#![cfg(feature = "serde")]

use modelwright_core::{Options, Value};

#[test]
fn missing_fields_fall_back_to_defaults() {
    let options: Options = serde_json::from_str(r#"{ "discriminator_name": "Kind" }"#).unwrap();

    assert_eq!(options.get_discriminator_name(), "Kind");
    assert_eq!(options.get_convention_event_limit(), None);
    assert!(options.reports_rejected_conventions());
}

#[test]
fn all_fields() {
    let options: Options = serde_json::from_str(
        r#"{
            "discriminator_name": "Type",
            "convention_event_limit": 500,
            "report_rejected_conventions": false
        }"#,
    )
    .unwrap();

    let mut expected = Options::default();
    expected
        .discriminator_name("Type")
        .convention_event_limit(500)
        .report_rejected_conventions(false);

    assert_eq!(options, expected);
}

#[test]
fn values_keep_their_variant() {
    let value: Value = serde_json::from_str(r#"{ "I32": 7 }"#).unwrap();
    assert_eq!(value, Value::I32(7));

    let json = serde_json::to_string(&Value::from("Credit")).unwrap();
    assert_eq!(json, r#"{"String":"Credit"}"#);
}
