//! Integration tests for livechart-common library.

use livechart_common::{
    Error, Format, KeyExprBuilder, Label, POINTS_EVENT, UpdateError, UpdateMessage,
    all_points_wildcard, decode, decode_update, encode, parse_key_expr,
};

#[test]
fn test_full_update_workflow() {
    let msg = UpdateMessage::new(vec![
        Label::Timestamp(1_700_000_000_000.0),
        Label::Timestamp(1_700_000_005_000.0),
        Label::Timestamp(1_700_000_010_000.0),
    ])
    .with_series("CPU", [Some(12.0), Some(15.5), None])
    .with_series("TCP Out", [Some(0.25), Some(0.5), Some(0.75)]);

    let json_bytes = encode(&msg, Format::Json).expect("JSON encode failed");
    let decoded = decode_update(&json_bytes).expect("JSON decode failed");
    assert_eq!(decoded, msg);

    let cbor_bytes = encode(&msg, Format::Cbor).expect("CBOR encode failed");
    let decoded = decode_update(&cbor_bytes).expect("CBOR decode failed");
    assert_eq!(decoded.points["CPU"], vec![Some(12.0), Some(15.5), None]);
    assert_eq!(decoded.labels.len(), 3);
}

#[test]
fn test_payload_from_other_producers() {
    // What a browser or script would push: string labels, integer samples.
    let payload = br#"
        {
            "labels": ["t1", "t2", "t3"],
            "points": { "RAM": [40, 41, null] }
        }
    "#;

    let msg = decode_update(payload).expect("decode failed");
    assert_eq!(msg.labels[2], Label::from("t3"));
    assert_eq!(msg.points["RAM"], vec![Some(40.0), Some(41.0), None]);
}

#[test]
fn test_rejected_payloads() {
    let cases: [&[u8]; 4] = [
        br#"{"labels": ["a", "b"]}"#,
        br#"{"points": {"CPU": []}}"#,
        br#"{"labels": ["a"], "points": {"CPU": []}}"#,
        br#"{"labels": [3000, 1000], "points": {}}"#,
    ];

    for payload in cases {
        assert!(
            decode_update(payload).is_err(),
            "payload should be rejected: {}",
            String::from_utf8_lossy(payload)
        );
    }
}

#[test]
fn test_update_error_is_reported() {
    let payload = br#"{"labels": [3000, 1000], "points": {}}"#;
    match decode_update(payload) {
        Err(Error::Update(UpdateError::DecreasingTimestamps { index })) => assert_eq!(index, 1),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_key_expression_building_and_parsing() {
    let key = KeyExprBuilder::new().points_key("server-events");
    assert_eq!(key, "livechart/server-events/points");

    let parsed = parse_key_expr(&key).expect("Parse failed");
    assert_eq!(parsed.chart, "server-events");
    assert_eq!(parsed.event, POINTS_EVENT);
}

#[test]
fn test_wildcard_key_expressions() {
    assert_eq!(all_points_wildcard(), "livechart/*/points");
    assert_eq!(
        KeyExprBuilder::new().chart_wildcard("status"),
        "livechart/status/**"
    );
}

#[test]
fn test_special_characters_in_chart_id() {
    let charts = ["server-01", "cpu_ram", "host.local", "192.168.1.1"];

    for chart in charts {
        let key = KeyExprBuilder::new().points_key(chart);
        let parsed = parse_key_expr(&key).unwrap();
        assert_eq!(parsed.chart, chart);
    }
}

#[test]
fn test_large_window_roundtrip() {
    let labels: Vec<Label> = (0..1000).map(|i| Label::Timestamp(i as f64 * 1000.0)).collect();
    let samples: Vec<Option<f64>> = (0..1000)
        .map(|i| if i % 7 == 0 { None } else { Some(i as f64 / 10.0) })
        .collect();
    let msg = UpdateMessage::new(labels).with_series("CPU", samples);

    let encoded = encode(&msg, Format::Cbor).unwrap();
    let decoded: UpdateMessage = decode(&encoded, Format::Cbor).unwrap();
    assert_eq!(decoded, msg);
    assert!(decoded.validate().is_ok());
}
