//! `config init` and `config show`.

use anyhow::Result;
use hlf_core::config::HlfConfig;

pub fn cmd_config_init() -> Result<()> {
    let path = HlfConfig::write_default_if_missing()?;
    println!("Config file: {}", path.display());
    Ok(())
}

pub fn cmd_config_show(config: &HlfConfig) -> Result<()> {
    println!("═══════════════════════════════════════");
    println!("  hlf Configuration");
    println!("═══════════════════════════════════════");
    match HlfConfig::file_path() {
        Ok(path) => println!("  File            : {}", path.display()),
        Err(e) => println!("  File            : ({e})"),
    }
    println!("  Admin           : {}", config.admin.name);
    println!("  Fabric tag      : {}", config.images.fabric_tag);
    println!("  CA tag          : {}", config.images.effective_ca_tag());
    println!("  Third-party tag : {}", config.images.third_party_tag);
    println!("  Configtx dir    : {}", config.orderer.configtx_dir);
    println!("  Orderer state   : {}", config.orderer.state_dir);
    println!("  Orderer config  : {}", config.orderer.config_dir);
    println!(
        "  Seek behavior   : {}",
        config.delivery.default_behavior.as_str_name()
    );
    Ok(())
}
