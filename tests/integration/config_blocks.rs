use crate::*;

use hlf_core::extract::{
    extract_config_envelope_from_block_data, extract_config_update, extract_last_config_index,
};
use hlf_core::wire::{ConfigSignature, ConfigUpdate, ConfigUpdateEnvelope, ConfigValue};
use hlf_core::{DecodeStage, ExtractError};

fn config_update() -> ConfigUpdate {
    let mut values = BTreeMap::new();
    values.insert(
        "BatchSize".to_string(),
        ConfigValue {
            version: 1,
            value: vec![0x08, 0x0a],
            mod_policy: "Admins".into(),
        },
    );
    let mut isolated = BTreeMap::new();
    isolated.insert("note".to_string(), b"raise batch size".to_vec());
    ConfigUpdate {
        channel_id: CHANNEL.into(),
        read_set: Some(channel_config(3).channel_group.unwrap()),
        write_set: Some(ConfigGroup {
            version: 1,
            values,
            ..Default::default()
        }),
        isolated_data: isolated,
    }
}

#[test]
fn test_config_update_round_trips_through_envelope() {
    let update = config_update();
    let update_envelope = ConfigUpdateEnvelope {
        config_update: update.encode_to_vec(),
        signatures: vec![ConfigSignature {
            signature_header: b"sh".to_vec(),
            signature: b"sig".to_vec(),
        }],
    };
    let bytes = envelope_bytes(
        HeaderType::ConfigUpdate,
        CHANNEL,
        update_envelope.encode_to_vec(),
    );

    assert_eq!(extract_config_update(&bytes).unwrap(), update);
}

#[test]
fn test_config_update_reports_failing_stage() {
    let bytes = envelope_bytes(HeaderType::ConfigUpdate, CHANNEL, vec![0xff, 0xff]);
    let err = extract_config_update(&bytes).unwrap_err();
    assert_eq!(err.stage(), Some(DecodeStage::ConfigUpdateEnvelope));

    let err = extract_config_update(&[0x0a, 0x05, 0x01]).unwrap_err();
    assert_eq!(err.stage(), Some(DecodeStage::Envelope));
}

#[test]
fn test_config_block_accepted_and_config_readable() {
    let block = config_block(CHANNEL, 5);
    assert_config_block(&block).unwrap();
    assert_eq!(extract_last_config_index(&block).unwrap(), 5);

    let data = &block.data.as_ref().unwrap().data[0];
    let envelope = extract_config_envelope_from_block_data(data).unwrap();
    assert_eq!(envelope.config, Some(channel_config(5)));
}

#[test]
fn test_last_config_index_on_data_block() {
    let tx = envelope_bytes(HeaderType::EndorserTransaction, CHANNEL, b"rwset".to_vec());
    let block = block(12, vec![tx], Some(9));
    assert_eq!(extract_last_config_index(&block).unwrap(), 9);
    assert!(matches!(
        assert_config_block(&block),
        Err(ExtractError::NotConfigBlock(name)) if name == "ENDORSER_TRANSACTION"
    ));
}

#[test]
fn test_config_block_rejects_wrong_transaction_count() {
    let one = envelope_bytes(HeaderType::Config, CHANNEL, Vec::new());

    let empty = block(1, vec![], None);
    assert!(matches!(
        assert_config_block(&empty),
        Err(ExtractError::TransactionCount(0))
    ));

    let two = block(1, vec![one.clone(), one], None);
    assert!(matches!(
        assert_config_block(&two),
        Err(ExtractError::TransactionCount(2))
    ));
}

#[test]
fn test_missing_last_config_metadata() {
    let mut block = block(0, vec![], None);
    block.metadata = Some(BlockMetadata {
        metadata: vec![Vec::new()],
    });
    assert!(matches!(
        extract_last_config_index(&block),
        Err(ExtractError::MissingMetadata(1))
    ));

    block.metadata = None;
    assert!(extract_last_config_index(&block).is_err());
}
