use docstream::buffers::Reader;
use docstream::{cbor, copy_document, json, DocumentWriter, Value};
use proptest::prelude::*;

fn containers(leaf: BoxedStrategy<Value>, key: BoxedStrategy<Value>) -> impl Strategy<Value = Value> {
    leaf.prop_recursive(4, 64, 6, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((key.clone(), inner), 0..6).prop_map(Value::Map),
        ]
    })
}

fn any_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        any::<u64>().prop_map(Value::Unsigned),
        (i64::MIN..0).prop_map(Value::Signed),
        any::<f64>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Value::Double),
        ".{0,16}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Binary),
    ]
    .boxed();
    containers(leaf.clone(), leaf)
}

/// Values JSON can carry without loss: no binary, no undefined, finite
/// doubles and text keys.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<u64>().prop_map(Value::Unsigned),
        (i64::MIN..0).prop_map(Value::Signed),
        any::<f64>()
            .prop_filter("JSON has no non-finite numbers", |f| f.is_finite())
            .prop_map(Value::Double),
        ".{0,16}".prop_map(Value::Text),
    ]
    .boxed();
    let key = ".{0,8}".prop_map(Value::Text).boxed();
    containers(leaf, key)
}

proptest! {
    #[test]
    fn cbor_roundtrip(value in any_value()) {
        let mut encoded: Vec<u8> = Vec::new();
        cbor::write(&mut encoded).write(&value).unwrap();
        let mut reader = Reader::new(&encoded);
        let decoded = Value::read(cbor::read(&mut reader).unwrap()).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(reader.remaining().is_empty());
    }

    #[test]
    fn json_roundtrip(value in json_value()) {
        let mut encoded: Vec<u8> = Vec::new();
        json::write(&mut encoded).write(&value).unwrap();
        let mut reader = Reader::new(&encoded);
        let decoded = Value::read(json::read(&mut reader).unwrap()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn cbor_to_json_matches_direct_json(value in json_value()) {
        let mut encoded: Vec<u8> = Vec::new();
        cbor::write(&mut encoded).write(&value).unwrap();
        let mut reader = Reader::new(&encoded);
        let mut via_cbor: Vec<u8> = Vec::new();
        copy_document(json::write(&mut via_cbor), cbor::read(&mut reader).unwrap()).unwrap();

        let mut direct: Vec<u8> = Vec::new();
        json::write(&mut direct).write(&value).unwrap();
        prop_assert_eq!(via_cbor, direct);
    }
}
