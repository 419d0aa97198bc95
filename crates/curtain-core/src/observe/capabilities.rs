use serde::{Deserialize, Serialize};

/// Host capabilities consumed at startup
///
/// Each flag models an environment API that may be absent; absence
/// degrades the corresponding feature, never the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Viewport intersection notifications are available
    pub intersection: bool,
    /// Structural mutation notifications are available
    pub mutation: bool,
    /// Smooth scrolling is available
    pub smooth_scroll: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection: true,
            mutation: true,
            smooth_scroll: true,
        }
    }
}
