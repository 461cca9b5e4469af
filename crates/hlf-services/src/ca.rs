//! Fabric CA server container: start command and image list.
//!
//! Only the argv and image references are produced here; creating
//! containers and pulling images is left to the container runtime.

use hlf_core::config::{AdminConfig, ImageConfig};
use hlf_core::wire::ChaincodeType;
use serde::{Deserialize, Serialize};

/// Listen port inside the CA container.
pub const CA_PORT: u16 = 7054;

/// Parent CA an intermediate CA enrolls with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCa {
    pub enrollment_id: String,
    pub enrollment_secret: String,
    pub host: String,
    pub port: u16,
}

/// One CA server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaSpec {
    /// Subject CN of the generated CA certificate.
    pub common_name: String,
    #[serde(default)]
    pub tls: bool,
    /// Present for an intermediate CA.
    #[serde(default)]
    pub parent: Option<ParentCa>,
    /// Registrar name; falls back to the configured admin.
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaCommandError {
    #[error("CA common name is empty")]
    MissingCommonName,

    #[error("bootstrap admin name {0:?} must not contain ':'")]
    InvalidAdminName(String),
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `fabric-ca-server start` argv.
///
/// The bootstrap identity is taken from `spec`, then `admin`, then the
/// built-in `Admin`/`passwd` registrar.
pub fn ca_server_command(
    spec: &CaSpec,
    admin: &AdminConfig,
) -> Result<Vec<String>, CaCommandError> {
    if spec.common_name.is_empty() {
        return Err(CaCommandError::MissingCommonName);
    }

    let fallback = AdminConfig::default();
    let name = non_empty(spec.admin_name.as_deref())
        .or(non_empty(Some(admin.name.as_str())))
        .unwrap_or(fallback.name.as_str());
    let password = non_empty(spec.admin_password.as_deref())
        .or(non_empty(Some(admin.password.as_str())))
        .unwrap_or(fallback.password.as_str());
    if name.contains(':') {
        return Err(CaCommandError::InvalidAdminName(name.to_string()));
    }

    let mut cmd = vec![
        "fabric-ca-server".to_string(),
        "start".to_string(),
        "-d".to_string(),
        "-b".to_string(),
        format!("{name}:{password}"),
    ];
    if spec.tls {
        cmd.push("--tls.enabled".to_string());
    }
    cmd.push(format!("--csr.cn={}", spec.common_name));
    cmd.push("--cors.enabled".to_string());

    if let Some(parent) = &spec.parent {
        let scheme = if spec.tls { "https" } else { "http" };
        cmd.push("-u".to_string());
        cmd.push(format!(
            "{scheme}://{}:{}@{}:{}",
            parent.enrollment_id, parent.enrollment_secret, parent.host, parent.port
        ));
    }

    Ok(cmd)
}

/// Images a network needs, for chaincode written in `chaincode`.
/// Components whose tag is empty are left out.
pub fn fabric_images(images: &ImageConfig, chaincode: ChaincodeType) -> Vec<String> {
    let mut refs = Vec::new();
    let fabric_tag = images.fabric_tag.as_str();
    if !fabric_tag.is_empty() {
        let builder = match chaincode {
            ChaincodeType::Java => "fabric-javaenv",
            _ => "fabric-ccenv",
        };
        for component in [builder, "fabric-orderer", "fabric-peer"] {
            refs.push(format!("hyperledger/{component}:{fabric_tag}"));
        }
    }

    let ca_tag = images.effective_ca_tag();
    if !ca_tag.is_empty() {
        refs.push(format!("hyperledger/fabric-ca:{ca_tag}"));
    }

    if !images.third_party_tag.is_empty() {
        refs.push(format!(
            "hyperledger/fabric-couchdb:{}",
            images.third_party_tag
        ));
    }

    refs
}
