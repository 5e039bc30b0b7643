use kanban_core::AppConfig;

/// Settings the service layer reads from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Serialize writes to the same board through a per-board lock. Off means
    /// concurrent moves are last-writer-wins.
    pub serialize_moves: bool,
    /// Records returned by `activity` when the caller gives no limit.
    pub activity_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            serialize_moves: config.effective_serialize_moves(),
            activity_limit: config.effective_activity_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_app_config() {
        let config = ServiceConfig::default();
        assert!(config.serialize_moves);
        assert_eq!(config.activity_limit, 50);

        let app = AppConfig {
            serialize_moves: Some(false),
            ..Default::default()
        };
        assert!(!ServiceConfig::from(&app).serialize_moves);
    }
}
