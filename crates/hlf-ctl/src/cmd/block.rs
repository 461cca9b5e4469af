//! `block` and `config-envelope` — inspect block files.

use anyhow::{Context, Result};
use hlf_core::extract::{
    assert_config_block, extract_channel_header, extract_config_envelope_from_block_data,
    extract_last_config_index,
};
use hlf_core::wire::{Block, HeaderType};
use prost::Message;

use super::args::Args;

pub fn read_block(path: &str) -> Result<Block> {
    let raw = std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
    Block::decode(raw.as_slice()).with_context(|| format!("{path} is not a protobuf Block"))
}

pub fn cmd_block(args: &Args) -> Result<()> {
    let path = args.one_positional("block file")?;
    let block = read_block(path)?;

    let number = block.header.as_ref().map(|h| h.number).unwrap_or(0);
    let transactions = block.data.as_ref().map(|d| d.data.as_slice()).unwrap_or(&[]);
    let tx_types: Vec<String> = transactions
        .iter()
        .map(|tx| match extract_channel_header(tx) {
            Ok(ch) => HeaderType::name_of(ch.r#type),
            Err(e) => format!("<{e}>"),
        })
        .collect();
    let is_config = assert_config_block(&block).is_ok();
    let last_config = extract_last_config_index(&block).ok();

    if args.switch("--json") {
        let summary = serde_json::json!({
            "number": number,
            "transactions": tx_types,
            "is_config_block": is_config,
            "last_config_index": last_config,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Block #{}", number);
    println!("═══════════════════════════════════════");
    println!("  Transactions : {}", tx_types.len());
    println!("  Config block : {}", if is_config { "yes" } else { "no" });
    match last_config {
        Some(index) => println!("  Last config  : {}", index),
        None => println!("  Last config  : (no LAST_CONFIG metadata)"),
    }
    for (i, t) in tx_types.iter().enumerate() {
        println!("  [{:>3}] {}", i, t);
    }

    Ok(())
}

pub fn cmd_config_envelope(args: &Args) -> Result<()> {
    let path = args.one_positional("block file")?;
    let block = read_block(path)?;
    assert_config_block(&block).with_context(|| format!("{path} is not a config block"))?;

    // assert_config_block guarantees exactly one entry
    let tx = block
        .data
        .as_ref()
        .and_then(|d| d.data.first())
        .context("config block has no data")?;
    let envelope = extract_config_envelope_from_block_data(tx)?;

    let config = envelope.config.unwrap_or_default();
    let channel_group = config.channel_group.unwrap_or_default();
    let groups: Vec<&String> = channel_group.groups.keys().collect();
    let values: Vec<&String> = channel_group.values.keys().collect();

    if args.switch("--json") {
        let summary = serde_json::json!({
            "sequence": config.sequence,
            "groups": groups,
            "values": values,
            "has_last_update": envelope.last_update.is_some(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Channel Config");
    println!("═══════════════════════════════════════");
    println!("  Sequence    : {}", config.sequence);
    println!("  Groups      : {}", join(&groups));
    println!("  Values      : {}", join(&values));
    println!(
        "  Last update : {}",
        if envelope.last_update.is_some() { "present" } else { "none" }
    );

    Ok(())
}

fn join(keys: &[&String]) -> String {
    if keys.is_empty() {
        "(none)".to_string()
    } else {
        keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    }
}
