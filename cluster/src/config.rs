use serde::{Deserialize, Serialize};

/// Clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Requested cluster count; clamped to `[2, n]` at run time.
    pub k: usize,
    pub seed: u64,
    pub max_iterations: usize,
    /// Keywords kept per cluster label.
    pub keyword_count: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 3,
            seed: 42,
            max_iterations: 25,
            keyword_count: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml() {
        let cfg: ClusterConfig = serde_yaml::from_str("k: 5").unwrap();
        assert_eq!(cfg.k, 5);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.max_iterations, 25);
        assert_eq!(cfg.keyword_count, 6);
    }
}
