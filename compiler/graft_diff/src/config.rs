//! Diff configuration.

/// How nodes that changed parent are reported.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DiffMode {
    /// Keep the match and report a Move.
    #[default]
    Move,
    /// Drop the match and report a Delete plus an Insert.
    DeleteInsert,
}

/// Tuning knobs of the matcher.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffConfig {
    pub mode: DiffMode,
    /// Smallest subtree height the top-down phase anchors on.
    pub min_height: u32,
    /// Dice coefficient a bottom-up candidate must exceed.
    pub similarity_threshold: f64,
    /// Largest subtree (in nodes) the recovery phase descends into.
    pub max_recovery_size: u32,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            mode: DiffMode::Move,
            min_height: 2,
            similarity_threshold: 0.5,
            max_recovery_size: 1000,
        }
    }
}

impl DiffConfig {
    #[must_use]
    pub fn with_mode(self, mode: DiffMode) -> Self {
        DiffConfig { mode, ..self }
    }
}
