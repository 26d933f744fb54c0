//! Configuration for the access-control layer.

/// How overlapping commits resolve against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitOrdering {
    /// Every resolution applies as it arrives.
    ///
    /// Acceptance promotes whatever model is current at that moment;
    /// rejection restores the last-good model captured when that commit
    /// started. An older commit resolving after a newer one can therefore
    /// overwrite the newer one's outcome.
    #[default]
    LastWriteWins,

    /// Commits carry a monotonically increasing sequence number and stale
    /// resolutions never overwrite newer state.
    ///
    /// The last-good model is always the accepted model with the highest
    /// sequence; the current model is the newest commit that has not been
    /// rejected, falling back to the last-good model.
    Sequenced,
}

/// Configuration for [`AccessControl`](crate::AccessControl).
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Key under which the permissions model is persisted.
    pub storage_key: String,
    /// Resolution policy for overlapping commits.
    pub commit_ordering: CommitOrdering,
    /// Write the default model to storage at first launch.
    pub seed_defaults: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            storage_key: "permissions".to_string(),
            commit_ordering: CommitOrdering::default(),
            seed_defaults: true,
        }
    }
}
