//! Pipeline configuration.

use std::time::Duration;

use crate::events::PipelineError;

/// Block pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Maximum number of blocks drained from the queue per batch
    pub batch_size: usize,
    /// Threads in the pool that validates the blocks of a batch
    pub validation_threads: usize,
    /// Ingestion worker back-off when the queue is empty
    pub idle_poll_interval: Duration,
    /// Orphan resolver back-off when no orphan could be resolved
    pub orphan_poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            validation_threads: num_cpus::get().max(1),
            idle_poll_interval: Duration::from_millis(5),
            orphan_poll_interval: Duration::from_millis(5),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.validation_threads == 0 {
            return Err(PipelineError::InvalidConfig(
                "validation_threads must be at least 1".into(),
            ));
        }
        if self.idle_poll_interval.is_zero() || self.orphan_poll_interval.is_zero() {
            return Err(PipelineError::InvalidConfig(
                "poll intervals must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 8);
        assert!(config.validation_threads >= 1);
        assert_eq!(config.idle_poll_interval, Duration::from_millis(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let config = PipelineConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let config = PipelineConfig {
            orphan_poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
