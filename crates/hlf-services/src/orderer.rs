//! Orderer container environment.
//!
//! Produces the `KEY=value` list handed to the container runtime when an
//! orderer node is started. Starting the container is not done here.

use hlf_core::config::OrdererPaths;
use serde::{Deserialize, Serialize};

/// Operations endpoint inside the container.
pub const OPERATIONS_LISTEN_ADDRESS: &str = "0.0.0.0:8443";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdererType {
    #[default]
    Solo,
    Kafka,
    Etcdraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Panic,
}

impl LoggingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }
}

impl std::str::FromStr for LoggingLevel {
    type Err = OrdererEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            _ => Err(OrdererEnvError::UnknownLoggingLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsProvider {
    Prometheus,
    Statsd,
    Disabled,
}

impl MetricsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prometheus => "prometheus",
            Self::Statsd => "statsd",
            Self::Disabled => "disabled",
        }
    }
}

/// Paths to TLS material as seen from inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsMaterial {
    pub key: String,
    pub cert: String,
    pub ca_cert: String,
    /// Extra root CAs trusted alongside `ca_cert`.
    #[serde(default)]
    pub root_cas: Vec<String>,
}

impl TlsMaterial {
    /// `[ca_cert,root_ca,...]` as Fabric's env list syntax expects.
    fn root_cas_list(&self) -> String {
        let all: Vec<&str> = std::iter::once(self.ca_cert.as_str())
            .chain(self.root_cas.iter().map(String::as_str))
            .collect();
        format!("[{}]", all.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspSpec {
    pub id: String,
    /// MSP directory inside the container.
    pub config_path: String,
}

/// One orderer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererEnvSpec {
    /// Genesis block file name under the configtx directory.
    pub genesis_file: String,
    pub msp: MspSpec,
    #[serde(default)]
    pub tls: Option<TlsMaterial>,
    #[serde(default)]
    pub orderer_type: OrdererType,
    /// Cluster TLS for etcdraft. Falls back to `tls`.
    #[serde(default)]
    pub raft_tls: Option<TlsMaterial>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationsOpts {
    /// Falls back to the node's TLS.
    #[serde(default)]
    pub tls: Option<TlsMaterial>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsOpts {
    pub provider: MetricsProvider,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrdererEnvError {
    #[error("etcdraft orderer must have mutual TLS configurations")]
    RaftWithoutTls,

    #[error("unknown logging level {0:?}")]
    UnknownLoggingLevel(String),
}

/// Build the orderer container environment.
pub fn orderer_env(
    spec: &OrdererEnvSpec,
    paths: &OrdererPaths,
    logging: Option<LoggingLevel>,
    operations: Option<&OperationsOpts>,
    metrics: Option<&MetricsOpts>,
) -> Result<Vec<String>, OrdererEnvError> {
    let configtx_dir = paths.configtx_dir.trim_end_matches('/');
    let mut env = vec![
        "ORDERER_GENERAL_LISTENADDRESS=0.0.0.0".to_string(),
        format!("ORDERER_GENERAL_TLS_ENABLED={}", spec.tls.is_some()),
        "ORDERER_GENERAL_GENESISMETHOD=file".to_string(),
        format!(
            "ORDERER_GENERAL_GENESISFILE={}/{}",
            configtx_dir, spec.genesis_file
        ),
        format!("ORDERER_GENERAL_LOCALMSPID={}", spec.msp.id),
        format!("ORDERER_GENERAL_LOCALMSPDIR={}", spec.msp.config_path),
        "GODEBUG=netdns=go".to_string(),
    ];

    if let Some(level) = logging {
        env.push(format!("FABRIC_LOGGING_SPEC={}", level.as_str()));
    }

    if let Some(tls) = &spec.tls {
        env.push(format!("ORDERER_GENERAL_TLS_PRIVATEKEY={}", tls.key));
        env.push(format!("ORDERER_GENERAL_TLS_CERTIFICATE={}", tls.cert));
        env.push(format!("ORDERER_GENERAL_TLS_ROOTCAS={}", tls.root_cas_list()));
    }

    match spec.orderer_type {
        OrdererType::Solo => {}
        OrdererType::Kafka => {
            env.push("ORDERER_KAFKA_RETRY_SHORTINTERVAL=1s".to_string());
            env.push("ORDERER_KAFKA_RETRY_SHORTTOTAL=30s".to_string());
            env.push("ORDERER_KAFKA_VERBOSE=true".to_string());
        }
        OrdererType::Etcdraft => {
            // egress buffer; consensus messages are dropped when it is full
            env.push("ORDERER_GENERAL_CLUSTER_SENDBUFFERSIZE=10".to_string());
            let raft_tls = spec
                .raft_tls
                .as_ref()
                .or(spec.tls.as_ref())
                .ok_or(OrdererEnvError::RaftWithoutTls)?;
            env.push(format!(
                "ORDERER_GENERAL_CLUSTER_CLIENTCERTIFICATE={}",
                raft_tls.cert
            ));
            env.push(format!(
                "ORDERER_GENERAL_CLUSTER_CLIENTPRIVATEKEY={}",
                raft_tls.key
            ));
            env.push(format!(
                "ORDERER_GENERAL_CLUSTER_ROOTCAS={}",
                raft_tls.root_cas_list()
            ));
        }
    }

    if let Some(ops) = operations {
        env.push(format!(
            "ORDERER_OPERATIONS_LISTENADDRESS={OPERATIONS_LISTEN_ADDRESS}"
        ));
        if let Some(tls) = ops.tls.as_ref().or(spec.tls.as_ref()) {
            env.push("ORDERER_OPERATIONS_TLS_ENABLED=true".to_string());
            env.push(format!("ORDERER_OPERATIONS_TLS_CERTIFICATE={}", tls.cert));
            env.push(format!("ORDERER_OPERATIONS_TLS_PRIVATEKEY={}", tls.key));
            env.push("ORDERER_OPERATIONS_TLS_CLIENTAUTHREQUIRED=false".to_string());
            env.push(format!(
                "ORDERER_OPERATIONS_TLS_CLIENTROOTCAS={}",
                tls.root_cas_list()
            ));
        }
    }

    if let Some(m) = metrics {
        env.push(format!("ORDERER_METRICS_PROVIDER={}", m.provider.as_str()));
    }

    Ok(env)
}

/// Docker volumes attached to an orderer container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererVolumes {
    /// Holds the crypto material; `MspSpec::config_path` points inside it.
    pub msp: String,
    /// Holds the genesis block.
    pub configtx: String,
    /// Ledger state; without it the ledger lives in the container.
    #[serde(default)]
    pub state: Option<String>,
}

/// Subdirectory of `OrdererPaths::config_dir` the MSP volume is mounted on.
pub const MSP_ROOT_DIR: &str = "crypto-config";

/// `volume:container_path` binds for the orderer container.
pub fn orderer_mounts(volumes: &OrdererVolumes, paths: &OrdererPaths) -> Vec<String> {
    let msp_root = format!(
        "{}/{}",
        paths.config_dir.trim_end_matches('/'),
        MSP_ROOT_DIR
    );
    let mut binds = vec![
        format!("{}:{}", volumes.msp, msp_root),
        format!("{}:{}", volumes.configtx, paths.configtx_dir),
    ];
    if let Some(state) = &volumes.state {
        binds.push(format!("{}:{}", state, paths.state_dir));
    }
    binds
}
