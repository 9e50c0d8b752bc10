//! Tests for JSON import and export

use rstest::rstest;
use serde_json::json;

use did_dnssec::domain::DomainError;
use did_dnssec::{export_json, import_json, Value};

const DOCUMENT: &str = r#"{
  "id": "did:dnssec:example.com",
  "verificationMethod": [
    {
      "id": "did:dnssec:example.com#key-1",
      "type": "JsonWebKey2020",
      "publicKeyJwk": {
        "kty": "OKP",
        "crv": "Ed25519",
        "x": "VCpo2LMLhn6iWku8MKvSLg2ZAoC-nlOyPVQaO3FxVeQ"
      }
    }
  ],
  "version": 3,
  "weight": 0.5,
  "active": true,
  "controllers": []
}"#;

#[test]
fn given_document_when_importing_and_exporting_then_json_is_preserved() {
    let tree = import_json(DOCUMENT.as_bytes()).unwrap();

    let exported = export_json(&tree).unwrap();

    assert_eq!(String::from_utf8(exported).unwrap(), DOCUMENT);
}

#[test]
fn given_document_when_importing_then_keys_keep_source_order() {
    let tree = import_json(br#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let root = tree.root_node().unwrap();

    let keys: Vec<&str> = root
        .children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().data.key.as_str())
        .collect();

    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn given_nested_arrays_when_importing_then_elements_are_keyed_by_position() {
    let tree = import_json(br#"{"m": [[1, "x"], {"k": false}]}"#).unwrap();

    assert_eq!(tree.lookup(&["m", "0", "1"]), Some(&Value::from("x")));
    assert_eq!(tree.lookup(&["m", "1", "k"]), Some(&Value::Bool(false)));
    assert_eq!(tree.lookup(&["m", "0"]), Some(&Value::Array));
}

#[rstest]
#[case("-0", 0)]
#[case("0", 0)]
#[case("9223372036854775807", i64::MAX)]
#[case("-9223372036854775808", i64::MIN)]
fn given_integer_literal_when_importing_then_classifies_as_int(
    #[case] literal: &str,
    #[case] expected: i64,
) {
    let tree = import_json(format!(r#"{{"n": {literal}}}"#).as_bytes()).unwrap();

    assert_eq!(tree.lookup(&["n"]), Some(&Value::Int(expected)));
}

#[rstest]
#[case("100000000000000000000")]
#[case("18446744073709551615")]
#[case("9223372036854775808")]
#[case("-9223372036854775809")]
fn given_integer_literal_outside_i64_when_importing_then_fails(#[case] literal: &str) {
    let err = import_json(format!(r#"{{"n": {literal}}}"#).as_bytes()).unwrap_err();

    assert!(
        matches!(err, DomainError::IntegerOutOfRange(ref text) if text == literal),
        "{err}"
    );
}

#[rstest]
#[case("-0.0", -0.0)]
#[case("1e2", 100.0)]
#[case("2E-1", 0.2)]
#[case("1.0", 1.0)]
fn given_fraction_or_exponent_when_importing_then_classifies_as_float(
    #[case] literal: &str,
    #[case] expected: f64,
) {
    let tree = import_json(format!(r#"{{"n": {literal}}}"#).as_bytes()).unwrap();

    assert_eq!(tree.lookup(&["n"]), Some(&Value::Float(expected)));
}

#[rstest]
#[case(r#"{"a": null}"#)]
#[case(r#"{"a": [1, null]}"#)]
#[case(r#"{"a": {"b": null}}"#)]
fn given_null_anywhere_when_importing_then_fails_with_invalid_primitive(#[case] input: &str) {
    let err = import_json(input.as_bytes()).unwrap_err();

    assert!(matches!(err, DomainError::InvalidPrimitive(_)), "{err}");
    assert!(err.to_string().starts_with("invalid primitive type; value = "));
}

#[rstest]
#[case("[1, 2]")]
#[case("\"text\"")]
#[case("42")]
fn given_non_object_root_when_importing_then_fails(#[case] input: &str) {
    let err = import_json(input.as_bytes()).unwrap_err();

    assert!(matches!(err, DomainError::NotAnObject(_)));
}

#[test]
fn given_malformed_json_when_importing_then_fails_with_parse_error() {
    let err = import_json(b"{\"a\": ").unwrap_err();

    assert!(matches!(err, DomainError::Json(_)));
}

#[test]
fn given_empty_containers_when_round_tripping_then_they_survive() {
    let input = json!({"list": [], "map": {}});
    let tree = import_json(input.to_string().as_bytes()).unwrap();

    let exported: serde_json::Value = serde_json::from_slice(&export_json(&tree).unwrap()).unwrap();

    assert_eq!(exported, input);
}
