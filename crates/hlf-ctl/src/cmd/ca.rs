//! `ca-command` and `images` — CA server argv and the image list.

use anyhow::{Context, Result};
use hlf_core::config::HlfConfig;
use hlf_core::wire::ChaincodeType;
use hlf_services::ca::CA_PORT;
use hlf_services::{ca_server_command, fabric_images, CaSpec};

use super::args::Args;

fn parse_chaincode_type(value: &str) -> Result<ChaincodeType> {
    match value.to_ascii_lowercase().as_str() {
        "golang" | "go" => Ok(ChaincodeType::Golang),
        "node" => Ok(ChaincodeType::Node),
        "java" => Ok(ChaincodeType::Java),
        other => anyhow::bail!("unknown chaincode type {other:?} (use golang, node or java)"),
    }
}

pub fn cmd_ca_command(args: &Args, config: &HlfConfig) -> Result<()> {
    let path = args.one_positional("CA spec file")?;
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let spec: CaSpec =
        serde_json::from_str(&text).with_context(|| format!("failed to parse {path}"))?;

    let cmd = ca_server_command(&spec, &config.admin)?;
    let image = format!("hyperledger/fabric-ca:{}", config.images.effective_ca_tag());
    tracing::debug!(cn = %spec.common_name, %image, "ca command built");

    if args.switch("--json") {
        let summary = serde_json::json!({
            "image": image,
            "port": CA_PORT,
            "cmd": cmd,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  CA Server");
    println!("═══════════════════════════════════════");
    println!("  Image : {}", image);
    println!("  Port  : {}", CA_PORT);
    println!("  Cmd   : {}", cmd.join(" "));
    Ok(())
}

pub fn cmd_images(args: &Args, config: &HlfConfig) -> Result<()> {
    let chaincode = match args.value("--chaincode-type") {
        Some(v) => parse_chaincode_type(v)?,
        None => ChaincodeType::Golang,
    };
    let refs = fabric_images(&config.images, chaincode);

    if args.switch("--json") {
        println!("{}", serde_json::to_string_pretty(&refs)?);
    } else {
        for r in &refs {
            println!("{}", r);
        }
    }
    Ok(())
}
