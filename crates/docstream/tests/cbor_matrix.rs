use docstream::buffers::Reader;
use docstream::{
    cbor, ArrayStream, ArrayWriter, Document, DocumentWriter, Kind, MapWriter, StreamWriter, Value,
};

fn encode(value: &Value) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    cbor::write(&mut out).write(value).unwrap();
    out
}

fn decode(bytes: &[u8]) -> docstream::Result<Value> {
    let mut reader = Reader::new(bytes);
    let value = Value::read(cbor::read(&mut reader)?)?;
    Ok(value)
}

#[test]
fn integer_header_boundaries() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (23, &[0x17]),
        (24, &[0x18, 0x18]),
        (255, &[0x18, 0xff]),
        (256, &[0x19, 0x01, 0x00]),
        (65535, &[0x19, 0xff, 0xff]),
        (65536, &[0x1a, 0x00, 0x01, 0x00, 0x00]),
        (4294967295, &[0x1a, 0xff, 0xff, 0xff, 0xff]),
        (4294967296, &[0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]),
        (u64::MAX, &[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    ];
    for (value, expected) in cases {
        let encoded = encode(&Value::Unsigned(*value));
        assert_eq!(&encoded, expected, "encoding {value}");
        assert_eq!(decode(&encoded).unwrap(), Value::Unsigned(*value));
    }
}

#[test]
fn negative_integer_boundaries() {
    let cases: &[(i64, &[u8])] = &[
        (-1, &[0x20]),
        (-24, &[0x37]),
        (-25, &[0x38, 0x18]),
        (-256, &[0x38, 0xff]),
        (-257, &[0x39, 0x01, 0x00]),
        (-65537, &[0x3a, 0x00, 0x01, 0x00, 0x00]),
        (i64::MIN, &[0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    ];
    for (value, expected) in cases {
        let encoded = encode(&Value::Signed(*value));
        assert_eq!(&encoded, expected, "encoding {value}");
        assert_eq!(decode(&encoded).unwrap(), Value::Signed(*value));
    }
}

#[test]
fn signed_non_negative_uses_unsigned_major_type() {
    let mut out: Vec<u8> = Vec::new();
    cbor::write(&mut out).write_i64(10).unwrap();
    assert_eq!(out, [0x0a]);
    assert_eq!(decode(&out).unwrap(), Value::Unsigned(10));
}

#[test]
fn narrow_integer_overloads_match_u64() {
    let mut wide: Vec<u8> = Vec::new();
    cbor::write(&mut wide).write_u64(70000).unwrap();
    let mut narrow: Vec<u8> = Vec::new();
    cbor::write(&mut narrow).write(70000u32).unwrap();
    assert_eq!(wide, narrow);

    let mut wide: Vec<u8> = Vec::new();
    cbor::write(&mut wide).write_i64(-5).unwrap();
    let mut narrow: Vec<u8> = Vec::new();
    cbor::write(&mut narrow).write(-5i8).unwrap();
    assert_eq!(wide, narrow);
}

#[test]
fn mixed_map_literal() {
    let mut out: Vec<u8> = Vec::new();
    let mut map = cbor::write(&mut out).write_map(None).unwrap();
    map.append_key().write_str("A").unwrap();
    map.append_value().write_u64(1).unwrap();
    map.append_key().write_str("B").unwrap();
    let mut text = map.append_value().write_text(Some(4)).unwrap();
    text.write_buffer(b"text").unwrap();
    text.flush().unwrap();
    map.append_key().write_str("C").unwrap();
    let mut binary = map.append_value().write_binary(Some(12)).unwrap();
    binary.write_buffer(b"Hello world!").unwrap();
    binary.flush().unwrap();
    map.flush().unwrap();

    let mut expected = vec![
        0xbf, 0x61, 0x41, 0x01, 0x61, 0x42, 0x64, 0x74, 0x65, 0x78, 0x74, 0x61, 0x43, 0x4c,
    ];
    expected.extend_from_slice(b"Hello world!");
    expected.push(0xff);
    assert_eq!(out.len(), 27);
    assert_eq!(out, expected);

    assert_eq!(
        decode(&out).unwrap(),
        Value::Map(vec![
            (Value::from("A"), Value::Unsigned(1)),
            (Value::from("B"), Value::from("text")),
            (Value::from("C"), Value::Binary(b"Hello world!".to_vec())),
        ])
    );
}

#[test]
fn indefinite_containers_end_with_break() {
    let mut out: Vec<u8> = Vec::new();
    let mut array = cbor::write(&mut out).write_array(None).unwrap();
    array.append().write_bool(true).unwrap();
    array.append().write_map(None).unwrap().flush().unwrap();
    array.flush().unwrap();
    assert_eq!(out, [0x9f, 0xf5, 0xbf, 0xff, 0xff]);
}

#[test]
fn decoding_stops_at_the_break_byte() {
    let bytes = [0x9f, 0x01, 0x9f, 0xff, 0xff, 0x63, b'e', b'n', b'd'];
    let mut reader = Reader::new(&bytes);
    let first = Value::read(cbor::read(&mut reader).unwrap()).unwrap();
    assert_eq!(
        first,
        Value::Array(vec![Value::Unsigned(1), Value::Array(vec![])])
    );
    let second = Value::read(cbor::read(&mut reader).unwrap()).unwrap();
    assert_eq!(second, Value::from("end"));
    assert!(reader.remaining().is_empty());
}

#[test]
fn lazy_array_reads_elements_on_demand() {
    let bytes = [0x83, 0x01, 0x62, b'h', b'i', 0xf4];
    let mut reader = Reader::new(&bytes);
    let Document::Array(mut array) = cbor::read(&mut reader).unwrap() else {
        panic!("expected an array");
    };
    assert_eq!(array.size(), Some(3));
    let kinds: Vec<Kind> = {
        let mut kinds = Vec::new();
        while let Some(element) = array.next().unwrap() {
            kinds.push(element.kind());
            element.skip().unwrap();
        }
        kinds
    };
    assert_eq!(kinds, [Kind::Unsigned, Kind::Text, Kind::Bool]);
}

#[test]
fn scalar_matrix() {
    let values = vec![
        Value::Null,
        Value::Undefined,
        Value::Bool(true),
        Value::Bool(false),
        Value::Double(0.1),
        Value::Double(-123.123),
        Value::Double(f64::INFINITY),
        Value::Binary(vec![]),
        Value::Binary(vec![1, 2, 3, 4, 5]),
        Value::from(""),
        Value::from("asdf asfd 😱 asdf asdf 👀 as"),
        Value::Array(vec![Value::Unsigned(1), Value::from("a"), Value::Signed(-2)]),
        Value::Map(vec![
            (Value::Unsigned(1), Value::Null),
            (Value::Binary(vec![0xff]), Value::Array(vec![])),
        ]),
    ];
    for value in values {
        let encoded = encode(&value);
        assert_eq!(decode(&encoded).unwrap(), value, "{encoded:02x?}");
    }
}

#[test]
fn doubles_are_written_as_float64() {
    let encoded = encode(&Value::Double(1.0));
    assert_eq!(encoded, [0xfb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn self_described_documents_read_back() {
    let mut out: Vec<u8> = Vec::new();
    cbor::write_no_debug_check(&mut out)
        .write_self_described()
        .unwrap()
        .write_str("x")
        .unwrap();
    assert_eq!(out, [0xd9, 0xd9, 0xf7, 0x61, b'x']);
    assert_eq!(decode(&out).unwrap(), Value::from("x"));
}

#[test]
fn checked_writer_for_a_tagged_item() {
    let mut out: Vec<u8> = Vec::new();
    let mut array = cbor::write_tagged(&mut out, 1)
        .unwrap()
        .write_array(Some(2))
        .unwrap();
    array.append().write_u64(1).unwrap();
    array.append().write_str("a").unwrap();
    array.flush().unwrap();
    assert_eq!(out, [0xc1, 0x82, 0x01, 0x61, b'a']);
    assert_eq!(
        decode(&out).unwrap(),
        Value::Array(vec![Value::Unsigned(1), Value::from("a")])
    );
}

#[test]
fn malformed_input_matrix() {
    let cases: &[(&str, &[u8])] = &[
        ("empty input", &[]),
        ("stray break", &[0xff]),
        ("reserved info", &[0x1d]),
        ("truncated argument", &[0x1a, 0x00, 0x01]),
        ("truncated text", &[0x63, b'a']),
        ("truncated array", &[0x82, 0x01]),
        ("break in sized array", &[0x82, 0x01, 0xff]),
        ("indefinite integer", &[0x1f]),
        ("unassigned simple", &[0xf0]),
        ("negative overflow", &[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ("invalid utf-8", &[0x62, 0xc3, 0x28]),
        ("odd indefinite map", &[0xbf, 0x01, 0xff]),
    ];
    for (name, bytes) in cases {
        match decode(bytes) {
            Err(err) => assert!(err.is_malformed(), "{name}: {err}"),
            Ok(value) => panic!("{name}: decoded {value:?}"),
        }
    }
}
