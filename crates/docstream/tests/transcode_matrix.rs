use std::io::Cursor;

use docstream::buffers::{IoReader, IoWriter, Reader, WriteStream, Writer};
use docstream::{cbor, copy_document, json, Document, DocumentWriter, MapStream, Value};

fn json_to_cbor(text: &str) -> Vec<u8> {
    let mut reader = Reader::new(text.as_bytes());
    let mut out: Vec<u8> = Vec::new();
    copy_document(cbor::write(&mut out), json::read(&mut reader).unwrap()).unwrap();
    out
}

fn cbor_to_json(bytes: &[u8]) -> String {
    let mut reader = Reader::new(bytes);
    let mut out: Vec<u8> = Vec::new();
    copy_document(json::write(&mut out), cbor::read(&mut reader).unwrap()).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn json_map_becomes_indefinite_cbor_map() {
    let encoded = json_to_cbor(r#"{"a":[1,2,3],"b":3.0}"#);
    // JSON strings have no length up front, so they become indefinite text
    let mut expected = vec![0xbf, 0x7f, 0x61, b'a', 0xff, 0x9f, 0x01, 0x02, 0x03, 0xff];
    expected.extend_from_slice(&[0x7f, 0x61, b'b', 0xff]);
    expected.extend_from_slice(&[0xfb, 0x40, 0x08, 0, 0, 0, 0, 0, 0]);
    expected.push(0xff);
    assert_eq!(encoded, expected);

    let mut reader = Reader::new(&encoded);
    assert_eq!(
        Value::read(cbor::read(&mut reader).unwrap()).unwrap(),
        Value::Map(vec![
            (
                Value::from("a"),
                Value::Array(vec![
                    Value::Unsigned(1),
                    Value::Unsigned(2),
                    Value::Unsigned(3)
                ])
            ),
            (Value::from("b"), Value::Double(3.0)),
        ])
    );
}

#[test]
fn cbor_to_json_text() {
    let mut bytes = vec![0xa3, 0x61, b'A', 0x01, 0x61, b'B', 0x64];
    bytes.extend_from_slice(b"text");
    bytes.extend_from_slice(&[0x61, b'C', 0x4c]);
    bytes.extend_from_slice(b"Hello world!");
    assert_eq!(
        cbor_to_json(&bytes),
        r#"{"A":1,"B":"text","C":"SGVsbG8gd29ybGQh"}"#
    );
}

#[test]
fn json_survives_a_trip_through_cbor() {
    let documents = [
        r#"{"a":[1,2,3],"b":3.0}"#,
        r#"[-1,0.25,true,false,null,"é😀"]"#,
        r#"{"empty":{},"list":[],"deep":[[[["x"]]]]}"#,
        r#""line\nbreak""#,
    ];
    for text in documents {
        let back = cbor_to_json(&json_to_cbor(text));
        let expected: serde_json::Value = serde_json::from_str(text).unwrap();
        let actual: serde_json::Value = serde_json::from_str(&back).unwrap();
        assert_eq!(actual, expected, "{text} came back as {back}");
    }
}

#[test]
fn cbor_tags_and_short_floats_flatten_into_json() {
    // tag 1 (epoch time) around a half-precision 1.5, then a single-precision 0.5
    let bytes = [0x82, 0xc1, 0xf9, 0x3e, 0x00, 0xfa, 0x3f, 0x00, 0x00, 0x00];
    assert_eq!(cbor_to_json(&bytes), "[1.5,0.5]");
}

#[test]
fn undefined_has_no_json_form() {
    assert_eq!(cbor_to_json(&[0x82, 0xf7, 0xf6]), "[null,null]");
}

#[test]
fn partially_read_map_can_be_copied() {
    let mut reader = Reader::new(br#"{"skip":[1,2],"keep":{"x":true}}"#);
    let Document::Map(mut map) = json::read(&mut reader).unwrap() else {
        panic!("expected a map");
    };
    map.next_key().unwrap().unwrap().skip().unwrap();
    map.read_value().unwrap().skip().unwrap();
    map.next_key().unwrap().unwrap().skip().unwrap();
    let mut out: Vec<u8> = Vec::new();
    copy_document(cbor::write(&mut out), map.read_value().unwrap()).unwrap();
    assert!(map.next_key().unwrap().is_none());
    assert_eq!(out, [0xbf, 0x7f, 0x61, b'x', 0xff, 0xf5, 0xff]);
}

#[test]
fn io_adapters_stream_between_formats() {
    let mut source = IoReader::new(Cursor::new(br#"[{"k":"v"}, 7, -8]"#.to_vec()));
    let mut sink = IoWriter::new(Vec::new());
    copy_document(cbor::write(&mut sink), json::read(&mut source).unwrap()).unwrap();
    sink.flush().unwrap();
    let encoded = sink.into_inner();
    assert_eq!(
        encoded,
        [0x9f, 0xbf, 0x7f, 0x61, b'k', 0xff, 0x7f, 0x61, b'v', 0xff, 0xff, 0x07, 0x27, 0xff]
    );

    let mut source = IoReader::new(Cursor::new(encoded));
    let mut sink = IoWriter::new(Vec::new());
    copy_document(json::write(&mut sink), cbor::read(&mut source).unwrap()).unwrap();
    assert_eq!(sink.into_inner(), br#"[{"k":"v"},7,-8]"#);
}

#[test]
fn in_memory_writer_collects_a_sequence_of_documents() {
    let mut sink = Writer::with_capacity(8);
    for text in ["[1,2]", "\"x\"", "null"] {
        let mut reader = Reader::new(text.as_bytes());
        copy_document(cbor::write(&mut sink), json::read(&mut reader).unwrap()).unwrap();
    }
    cbor::write(&mut sink).write(-1i32).unwrap();
    let encoded = sink.take();
    assert_eq!(
        encoded,
        [0x9f, 0x01, 0x02, 0xff, 0x7f, 0x61, b'x', 0xff, 0xf6, 0x20]
    );
    assert!(sink.written().is_empty());

    let mut reader = Reader::new(&encoded);
    let mut values = Vec::new();
    while !reader.remaining().is_empty() {
        values.push(Value::read(cbor::read(&mut reader).unwrap()).unwrap());
    }
    assert_eq!(
        values,
        [
            Value::Array(vec![Value::Unsigned(1), Value::Unsigned(2)]),
            Value::from("x"),
            Value::Null,
            Value::Signed(-1),
        ]
    );
}
