//! Diagnostic marker generation for the pure pursuit controller
pub mod config;
pub mod marker;
pub mod primitives;
pub mod sink;

use self::config::VisConfig;

/// Frame and namespace binding for one publishing channel.
///
/// Both strings are echoed verbatim into every marker; nothing here
/// resolves frames or registers namespaces.
#[derive(Debug, Clone, PartialEq)]
pub struct VisContext {
    pub frame_id: String,
    pub namespace: String,
    pub config: VisConfig,
}

impl VisContext {
    /// Create a context with the default configuration
    pub fn new(frame_id: &str, namespace: &str) -> Self {
        VisContext {
            frame_id: frame_id.to_string(),
            namespace: namespace.to_string(),
            config: VisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VisConfig) -> Self {
        self.config = config;
        self
    }

    /// Namespace of a primitive family
    pub fn ns(&self, suffix: &str) -> String {
        format!("{}{}", self.namespace, suffix)
    }
}
