//! `seek` — build an unsigned Deliver request payload.

use anyhow::{Context, Result};
use hlf_core::builder::build_seek_payload;
use hlf_core::config::HlfConfig;
use hlf_core::wire::SeekBehavior;
use hlf_core::{IdentityContext, SeekHeight};
use prost::Message;

use super::args::Args;

fn parse_behavior(value: &str) -> Result<SeekBehavior> {
    let normalized = match value.to_ascii_lowercase().as_str() {
        "block" => "BLOCK_UNTIL_READY".to_string(),
        "fail" => "FAIL_IF_NOT_READY".to_string(),
        _ => value.to_ascii_uppercase(),
    };
    SeekBehavior::from_str_name(&normalized)
        .with_context(|| format!("unknown seek behavior {value:?} (use block or fail)"))
}

pub fn cmd_seek(args: &Args, config: &HlfConfig) -> Result<()> {
    let channel = args.required("--channel")?;
    let msp_id = args.required("--msp-id")?;
    let cert_path = args.required("--cert")?;
    let start = args
        .parsed::<SeekHeight>("--start")?
        .unwrap_or(SeekHeight::Oldest);
    let stop = args
        .parsed::<SeekHeight>("--stop")?
        .unwrap_or(SeekHeight::Newest);
    let behavior = match args.value("--behavior") {
        Some(v) => parse_behavior(v)?,
        None => config.delivery.default_behavior,
    };

    let cert = std::fs::read(cert_path)
        .with_context(|| format!("failed to read certificate {cert_path}"))?;
    let identity = IdentityContext::new(msp_id, &cert);
    let tx = identity.new_tx(channel);

    let payload = build_seek_payload(&tx, start, stop, Some(behavior));
    let bytes = payload.encode_to_vec();

    tracing::debug!(
        channel,
        tx_id = %tx.tx_id,
        %start,
        %stop,
        behavior = behavior.as_str_name(),
        "seek payload built"
    );

    if let Some(out) = args.value("--out") {
        std::fs::write(out, &bytes).with_context(|| format!("failed to write {out}"))?;
    }

    if args.switch("--json") {
        let summary = serde_json::json!({
            "channel_id": channel,
            "tx_id": tx.tx_id,
            "start": start.to_string(),
            "stop": stop.to_string(),
            "behavior": behavior.as_str_name(),
            "payload_hex": hex::encode(&bytes),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Seek Payload (unsigned)");
    println!("═══════════════════════════════════════");
    println!("  Channel  : {}", channel);
    println!("  Tx ID    : {}", tx.tx_id);
    println!("  Range    : {} → {}", start, stop);
    println!("  Behavior : {}", behavior.as_str_name());
    println!("  Size     : {} bytes", bytes.len());
    match args.value("--out") {
        Some(out) => println!("  Written  : {}", out),
        None => println!("\n{}", hex::encode(&bytes)),
    }

    Ok(())
}
