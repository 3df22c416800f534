//! End-to-end stream splitting: fragmentation equivalence, byte
//! accounting, resynchronization after corruption.

use navstream_core::protocols::{at, nmea, ubx};
use navstream_core::{Direction, Engine, FieldMap, FieldValue, Message, Protocol};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn nav_pvt_frame() -> Vec<u8> {
    let mut fields = FieldMap::new();
    fields.insert("iTOW", FieldValue::U64(433_200_000));
    fields.insert("numSV", FieldValue::U64(12));
    fields.insert("lon", FieldValue::F64(11.5167));
    fields.insert("lat", FieldValue::F64(48.1173));
    ubx::make("NAV-PVT", &fields).expect("encode NAV-PVT").raw
}

fn mixed_stream() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"AT+CEREG?\r");
    data.extend_from_slice(b"\r\n+CEREG: 0,1\r\n");
    data.extend_from_slice(b"\r\nOK\r\n");
    data.extend_from_slice(&nav_pvt_frame());
    data.extend_from_slice(&[0x7F, 0x81]); // line noise
    data.extend_from_slice(GGA);
    data.extend_from_slice(b"boot: rover ready\r\n");
    data
}

fn parse_all(engine: &mut Engine, data: &[u8], chunk: usize) -> Vec<Message> {
    let mut messages = Vec::new();
    for piece in data.chunks(chunk) {
        engine.append(piece);
        messages.extend(
            engine
                .parse()
                .expect("parse")
                .into_iter()
                .filter(|msg| msg.direction != Direction::Pending),
        );
    }
    messages
}

#[test]
fn byte_at_a_time_equals_one_append() {
    let data = mixed_stream();

    let mut whole = Engine::new();
    let expected = parse_all(&mut whole, &data, data.len());

    let mut fragmented = Engine::new();
    let actual = parse_all(&mut fragmented, &data, 1);

    assert_eq!(expected.len(), actual.len());
    for (a, b) in expected.iter().zip(actual.iter()) {
        assert_eq!(a.protocol, b.protocol);
        assert_eq!(a.id, b.id);
        assert_eq!(a.raw, b.raw);
    }
    assert_eq!(whole.buffered(), fragmented.buffered());
}

#[test]
fn no_byte_is_ever_lost() {
    // Valid frames, garbage, and a trailing partial frame.
    let mut data = mixed_stream();
    data.extend_from_slice(&nav_pvt_frame()[..10]);

    let mut engine = Engine::new();
    engine.append(&data);
    let mut raws: Vec<u8> = engine
        .parse()
        .expect("parse")
        .into_iter()
        .filter(|msg| msg.direction != Direction::Pending)
        .flat_map(|msg| msg.raw)
        .collect();
    if let Some(pending) = engine.pending() {
        raws.extend_from_slice(&pending.raw);
    }
    assert_eq!(raws, data);
}

#[test]
fn message_order_matches_stream_order() {
    let mut engine = Engine::new();
    engine.append(&mixed_stream());
    let messages = engine.parse().expect("parse");

    let kinds: Vec<(Protocol, Option<&str>)> = messages
        .iter()
        .map(|msg| (msg.protocol, msg.id.as_deref()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (Protocol::At, Some("+CEREG")),
            (Protocol::At, Some("+CEREG")),
            (Protocol::At, Some("OK")),
            (Protocol::Ubx, Some("NAV-PVT")),
            (Protocol::Unknown, None),
            (Protocol::Nmea, Some("GGA")),
            (Protocol::Text, None),
        ]
    );
}

#[test]
fn corrupted_nav_pvt_becomes_unknown() {
    let mut frame = nav_pvt_frame();
    frame[20] ^= 0x01; // payload bit flip, checksum untouched
    frame.extend_from_slice(GGA);

    let mut engine = Engine::new();
    engine.append(&frame);
    let messages = engine.parse().expect("parse");

    assert!(messages.iter().all(|msg| msg.protocol != Protocol::Ubx));
    let unknown = &messages[0];
    assert_eq!(unknown.protocol, Protocol::Unknown);
    assert_eq!(unknown.raw.len(), nav_pvt_frame().len());
    assert_eq!(messages[1].protocol, Protocol::Nmea);
}

#[test]
fn decoded_nav_pvt_fields_round_trip() {
    let mut engine = Engine::new();
    engine.append(&nav_pvt_frame());
    let messages = engine.parse().expect("parse");
    assert_eq!(messages.len(), 1);

    let fields = messages[0].fields.as_ref().expect("decoded fields");
    assert_eq!(fields.get("iTOW"), Some(&FieldValue::U64(433_200_000)));
    assert_eq!(fields.get("numSV"), Some(&FieldValue::U64(12)));
    let Some(FieldValue::F64(lat)) = fields.get("lat") else {
        panic!("expected scaled latitude");
    };
    assert!((lat - 48.1173).abs() < 1e-6);
}

#[test]
fn interleaved_outbound_frames_parse_back() {
    let mut data = Vec::new();
    data.extend_from_slice(&at::make("+CGMI").raw);
    data.extend_from_slice(&nmea::make("GPZDA,160012.71,11,03,2004,-1,00").raw);
    data.extend_from_slice(&ubx::make("SEC-UNIQID", &FieldMap::new()).expect("poll frame").raw);

    let messages = navstream_core::make(&data).expect("batch scan");
    let ids: Vec<Option<&str>> = messages.iter().map(|msg| msg.id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![Some("+CGMI"), Some("ZDA"), Some("SEC-UNIQID")]
    );
}

#[test]
fn crlf_shared_between_response_and_sentence() {
    // A URC immediately followed by an NMEA sentence that reuses the
    // terminator: the tie-break hands `$G` to the sentence protocol.
    let mut data = Vec::new();
    data.extend_from_slice(b"\r\n+CGEV: ME PDN ACT 1\r\n");
    data.extend_from_slice(GGA);

    let messages = navstream_core::make(&data).expect("batch scan");
    let protocols: Vec<Protocol> = messages.iter().map(|msg| msg.protocol).collect();
    assert_eq!(
        protocols,
        vec![Protocol::At, Protocol::Text, Protocol::Nmea]
    );
    assert_eq!(messages[0].id.as_deref(), Some("+CGEV"));
    assert_eq!(messages[2].id.as_deref(), Some("GGA"));
}
