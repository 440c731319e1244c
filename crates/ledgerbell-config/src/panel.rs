use serde::{Deserialize, Serialize};

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_max_rows() -> usize {
    5
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_rows: default_max_rows(),
        }
    }
}
