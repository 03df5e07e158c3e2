use anyhow::{Context, Result};
use evosim_protocol::SimConfig;
use std::path::{Path, PathBuf};

const DEFAULT_SIM_CONFIG_REL_PATH: &str = "default.toml";

pub fn sim_config_from_toml_str(raw: &str) -> Result<SimConfig, toml::de::Error> {
    toml::from_str(raw)
}

pub fn default_sim_config() -> SimConfig {
    sim_config_from_toml_str(include_str!("../default.toml"))
        .expect("default sim config TOML must deserialize")
}

pub fn default_sim_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_SIM_CONFIG_REL_PATH)
}

pub fn load_default_sim_config() -> Result<SimConfig> {
    load_sim_config_from_path(&default_sim_config_path())
}

pub fn load_sim_config_from_path(path: &Path) -> Result<SimConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sim config from {}", path.display()))?;
    sim_config_from_toml_str(&raw)
        .context("sim config TOML failed schema deserialization")
        .with_context(|| format!("failed to parse sim config from {}", path.display()))
}
