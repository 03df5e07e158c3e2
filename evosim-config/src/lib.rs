mod config;

pub use config::{
    default_sim_config, default_sim_config_path, load_default_sim_config,
    load_sim_config_from_path, sim_config_from_toml_str,
};
