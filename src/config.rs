use crate::{
    error::{KrimpError, Result},
    types::ItemsetLength,
};

/// Parameters of the code-table search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KrimpConfig {
    /// Try to drop codes whose usage fell after each acceptance.
    pub prune: bool,
    /// Stop consuming candidates after this many. The table accepted so far
    /// is returned.
    pub candidate_limit: Option<usize>,
}

impl KrimpConfig {
    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_candidate_limit(mut self, limit: Option<usize>) -> Self {
        self.candidate_limit = limit;
        self
    }
}

/// Parameters of the built-in candidate generator.
#[derive(Clone, Debug, PartialEq)]
pub struct MiningConfig {
    /// Relative support threshold in `[0, 1]`.
    pub min_support: f32,
    pub max_len: ItemsetLength,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.05,
            max_len: 4,
        }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_support) {
            return Err(KrimpError::InvalidParameter {
                name: "min_support",
                reason: format!("{} is not within [0, 1]", self.min_support),
            });
        }
        if self.max_len < 1 {
            return Err(KrimpError::InvalidParameter {
                name: "max_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = KrimpConfig::default();
        assert!(!config.prune);
        assert_eq!(config.candidate_limit, None);

        let config = KrimpConfig::default()
            .with_pruning(true)
            .with_candidate_limit(Some(3));
        assert!(config.prune);
        assert_eq!(config.candidate_limit, Some(3));

        assert!(MiningConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_mining_parameters() {
        let config = MiningConfig {
            min_support: 1.5,
            ..MiningConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(KrimpError::InvalidParameter {
                name: "min_support",
                ..
            })
        ));

        let config = MiningConfig {
            max_len: 0,
            ..MiningConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MiningConfig {
            min_support: f32::NAN,
            ..MiningConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
