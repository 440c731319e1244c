use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub base_url: SmolStr,
    #[serde(default)]
    pub access_token: Option<SmolStr>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}
