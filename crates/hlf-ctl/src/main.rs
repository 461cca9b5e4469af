//! hlf-ctl — offline Fabric admin tooling: seek payloads, block and
//! config inspection, orderer environments.

mod cmd;

use anyhow::Result;
use hlf_core::config::HlfConfig;
use tracing_subscriber::EnvFilter;

use cmd::args::Args;

fn print_usage() {
    println!("Usage: hlf-ctl <command> [options]");
    println!();
    println!("Commands:");
    println!("  seek --channel <id> --msp-id <id> --cert <pem>");
    println!("       [--start <n|oldest|newest>] [--stop <n|oldest|newest>]");
    println!("       [--behavior <block|fail>] [--out <file>]");
    println!("                          Build an unsigned Deliver payload");
    println!("  block <file>            Summarize a block");
    println!("  config-envelope <file>  Show the config carried by a config block");
    println!("  config-update <file> [--out <file>]");
    println!("                          Decode the ConfigUpdate of a channel tx");
    println!("  orderer-env <spec.json> [--logging <level>] [--operations]");
    println!("       [--metrics <prometheus|statsd|disabled>]");
    println!("       [--msp-volume <v> --configtx-volume <v> [--state-volume <v>]]");
    println!("                          Print orderer container environment and mounts");
    println!("  ca-command <ca.json>    Print the fabric-ca-server start command");
    println!("  images [--chaincode-type <golang|node|java>]");
    println!("                          List the hyperledger images to pull");
    println!("  config init             Write the default config file");
    println!("  config show             Show the effective configuration");
    println!();
    println!("Options:");
    println!("  --json                  Machine-readable output");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let (command, rest) = match raw.split_first() {
        Some((c, rest)) => (c.as_str(), rest),
        None => ("help", &[][..]),
    };

    let config = HlfConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        HlfConfig::default()
    });

    let args = Args::parse(rest)?;
    let positional: Vec<&str> = args.positional.iter().map(String::as_str).collect();

    match (command, positional.as_slice()) {
        ("seek", _) => cmd::seek::cmd_seek(&args, &config),
        ("block", _) => cmd::block::cmd_block(&args),
        ("config-envelope", _) => cmd::block::cmd_config_envelope(&args),
        ("config-update", _) => cmd::config_update::cmd_config_update(&args),
        ("orderer-env", _) => cmd::orderer::cmd_orderer_env(&args, &config),
        ("ca-command", _) => cmd::ca::cmd_ca_command(&args, &config),
        ("images", _) => cmd::ca::cmd_images(&args, &config),
        ("config", ["init"]) => cmd::config::cmd_config_init(),
        ("config", ["show"] | []) => cmd::config::cmd_config_show(&config),
        ("help" | "--help" | "-h", _) => {
            print_usage();
            Ok(())
        }
        (other, _) => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
