//! `config-update` — decode a channel transaction's ConfigUpdate.

use anyhow::{Context, Result};
use hlf_core::extract::extract_config_update;
use hlf_core::wire::ConfigGroup;
use prost::Message;

use super::args::Args;

fn group_keys(group: Option<&ConfigGroup>) -> Vec<String> {
    group
        .map(|g| g.groups.keys().cloned().collect())
        .unwrap_or_default()
}

pub fn cmd_config_update(args: &Args) -> Result<()> {
    let path = args.one_positional("envelope file")?;
    let raw = std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
    let update =
        extract_config_update(&raw).with_context(|| format!("{path} holds no config update"))?;

    if let Some(out) = args.value("--out") {
        std::fs::write(out, update.encode_to_vec())
            .with_context(|| format!("failed to write {out}"))?;
        tracing::info!(channel = %update.channel_id, out, "config update written");
    }

    let read_set = group_keys(update.read_set.as_ref());
    let write_set = group_keys(update.write_set.as_ref());

    if args.switch("--json") {
        let summary = serde_json::json!({
            "channel_id": update.channel_id,
            "read_set": read_set,
            "write_set": write_set,
            "isolated_data": update.isolated_data.keys().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Config Update");
    println!("═══════════════════════════════════════");
    println!("  Channel   : {}", update.channel_id);
    println!("  Read set  : {}", read_set.join(", "));
    println!("  Write set : {}", write_set.join(", "));
    if let Some(out) = args.value("--out") {
        println!("  Written   : {}", out);
    }

    Ok(())
}
