pub mod api;
pub mod panel;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub api: api::Configuration,
    #[serde(default)]
    pub panel: panel::Configuration,
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        toml::from_str(&content).map_err(eyre::Report::from)
    }
}
