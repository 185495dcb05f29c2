//! Static service definitions

use serde::{Deserialize, Serialize};

use crate::registry::{PriorityClass, Service};

/// One statically configured backend service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unique service name
    pub name: String,
    /// Informational capability tags
    #[serde(default)]
    pub capability_tags: Vec<String>,
    /// Tie-break hint
    #[serde(default)]
    pub priority_class: PriorityClass,
}

impl From<ServiceConfig> for Service {
    fn from(config: ServiceConfig) -> Self {
        Service::new(config.name, config.capability_tags, config.priority_class)
    }
}
