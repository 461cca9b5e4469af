//! `orderer-env` — print the orderer container environment.

use anyhow::{Context, Result};
use hlf_core::config::HlfConfig;
use hlf_services::orderer::{LoggingLevel, MetricsOpts, MetricsProvider, OperationsOpts};
use hlf_services::{orderer_env, orderer_mounts, OrdererEnvSpec, OrdererVolumes};

use super::args::Args;

fn parse_provider(value: &str) -> Result<MetricsProvider> {
    match value.to_ascii_lowercase().as_str() {
        "prometheus" => Ok(MetricsProvider::Prometheus),
        "statsd" => Ok(MetricsProvider::Statsd),
        "disabled" => Ok(MetricsProvider::Disabled),
        other => anyhow::bail!("unknown metrics provider {other:?}"),
    }
}

pub fn cmd_orderer_env(args: &Args, config: &HlfConfig) -> Result<()> {
    let path = args.one_positional("orderer spec file")?;
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let spec: OrdererEnvSpec =
        serde_json::from_str(&text).with_context(|| format!("failed to parse {path}"))?;

    let logging = args.parsed::<LoggingLevel>("--logging")?;
    let operations = args.switch("--operations").then(OperationsOpts::default);
    let metrics = args
        .value("--metrics")
        .map(parse_provider)
        .transpose()?
        .map(|provider| MetricsOpts { provider });

    let env = orderer_env(
        &spec,
        &config.orderer,
        logging,
        operations.as_ref(),
        metrics.as_ref(),
    )?;

    let mounts = match (args.value("--msp-volume"), args.value("--configtx-volume")) {
        (Some(msp), Some(configtx)) => orderer_mounts(
            &OrdererVolumes {
                msp: msp.to_string(),
                configtx: configtx.to_string(),
                state: args.value("--state-volume").map(str::to_string),
            },
            &config.orderer,
        ),
        (None, None) => Vec::new(),
        _ => anyhow::bail!("--msp-volume and --configtx-volume go together"),
    };

    tracing::debug!(
        msp = %spec.msp.id,
        vars = env.len(),
        mounts = mounts.len(),
        "orderer env built"
    );

    if args.switch("--json") {
        let summary = serde_json::json!({ "env": env, "mounts": mounts });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in &env {
            println!("{}", line);
        }
        for bind in &mounts {
            println!("--volume {}", bind);
        }
    }
    Ok(())
}
