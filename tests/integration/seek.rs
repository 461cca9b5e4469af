use crate::*;

use hlf_core::builder::{build_envelope, build_seek_position, seek_height_of};
use hlf_core::wire::{seek_position, Payload, SeekInfo, SeekSpecified, SignatureHeader};
use hlf_core::{build_seek_payload, SeekBehavior, SeekHeight};

fn decode_seek(payload: &Payload) -> (hlf_core::wire::ChannelHeader, SeekInfo) {
    let header = payload.header.as_ref().expect("payload header");
    let channel_header =
        hlf_core::wire::ChannelHeader::decode(header.channel_header.as_slice()).unwrap();
    let seek_info = SeekInfo::decode(payload.data.as_slice()).unwrap();
    (channel_header, seek_info)
}

/// mychannel / tx1, blocks 0 through newest, waiting for new blocks.
#[test]
fn test_seek_from_genesis_to_newest() {
    let payload = build_seek_payload(
        &tx(CHANNEL, "tx1"),
        SeekHeight::Specified(0),
        SeekHeight::Newest,
        Some(SeekBehavior::BlockUntilReady),
    );

    let (channel_header, seek_info) = decode_seek(&payload);
    assert_eq!(channel_header.r#type, HeaderType::DeliverSeekInfo as i32);
    assert_eq!(channel_header.version, 1);
    assert_eq!(channel_header.channel_id, CHANNEL);
    assert_eq!(channel_header.tx_id, "tx1");

    assert_eq!(
        seek_info.start.unwrap().r#type,
        Some(seek_position::Type::Specified(SeekSpecified { number: 0 }))
    );
    assert!(matches!(
        seek_info.stop.unwrap().r#type,
        Some(seek_position::Type::Newest(_))
    ));
    assert_eq!(seek_info.behavior, SeekBehavior::BlockUntilReady as i32);
}

#[test]
fn test_seek_payload_survives_envelope_wrapping() {
    let payload = build_seek_payload(
        &tx(CHANNEL, "tx2"),
        SeekHeight::Oldest,
        SeekHeight::Specified(10),
        Some(SeekBehavior::FailIfNotReady),
    );
    let envelope = build_envelope(&payload, b"sig".to_vec());
    let wire = envelope.encode_to_vec();

    let decoded = Envelope::decode(wire.as_slice()).unwrap();
    assert_eq!(decoded.signature, b"sig");
    let inner = Payload::decode(decoded.payload.as_slice()).unwrap();
    assert_eq!(inner, payload);

    let signature_header = SignatureHeader::decode(
        inner.header.as_ref().unwrap().signature_header.as_slice(),
    )
    .unwrap();
    assert_eq!(signature_header.creator, CREATOR);
    assert_eq!(signature_header.nonce, vec![0x42; 24]);

    let (_, seek_info) = decode_seek(&inner);
    assert_eq!(seek_info.behavior, SeekBehavior::FailIfNotReady as i32);
    assert_eq!(
        seek_height_of(seek_info.start.as_ref().unwrap()),
        Some(SeekHeight::Oldest)
    );
    assert_eq!(
        seek_height_of(seek_info.stop.as_ref().unwrap()),
        Some(SeekHeight::Specified(10))
    );
}

#[test]
fn test_seek_positions_decode_to_requested_height() {
    for h in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
        let bytes = build_seek_position(SeekHeight::Specified(h)).encode_to_vec();
        let decoded = hlf_core::wire::SeekPosition::decode(bytes.as_slice()).unwrap();
        assert_eq!(seek_height_of(&decoded), Some(SeekHeight::Specified(h)));
    }
}

#[test]
fn test_unrecognized_height_is_rejected_at_parse() {
    assert!("latest".parse::<SeekHeight>().is_err());
    assert!("-1".parse::<SeekHeight>().is_err());
    assert_eq!("NEWEST".parse::<SeekHeight>().unwrap(), SeekHeight::Newest);
    assert_eq!("42".parse::<SeekHeight>().unwrap(), SeekHeight::Specified(42));
}

#[test]
fn test_omitted_behavior_fails_if_not_ready() {
    let payload = build_seek_payload(
        &tx(CHANNEL, "tx3"),
        SeekHeight::Newest,
        SeekHeight::Newest,
        None,
    );
    let (_, seek_info) = decode_seek(&payload);
    assert_eq!(seek_info.behavior, SeekBehavior::FailIfNotReady as i32);
}
