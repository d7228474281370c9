use serde::{Deserialize, Serialize};

/// Version reported by [`init`].
pub const VERSION: &str = "1.5.14";

/// Caller-supplied configuration, passed through untouched.
pub type Config = serde_json::Map<String, serde_json::Value>;

/// Readiness descriptor returned by [`init`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub ready: bool,
    pub version: String,
    pub config: Config,
}

/// Reports readiness and echoes the given configuration back.
///
/// `None` stands for an empty configuration.
pub fn init(config: Option<Config>) -> Descriptor {
    Descriptor {
        ready: true,
        version: VERSION.to_string(),
        config: config.unwrap_or_default(),
    }
}
