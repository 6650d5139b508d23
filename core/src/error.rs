use crate::types::Side;

/// Rejections raised while building an attack catalog.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown move `{0}`")]
    UnknownMove(String),

    #[error("move `{0}` is defined more than once")]
    DuplicateMove(&'static str),

    #[error("move `{0}` is missing from the catalog")]
    MissingMove(&'static str),

    #[error("move `{name}` is invalid: {reason}")]
    InvalidDefinition {
        name: &'static str,
        reason: &'static str,
    },
}

/// Rejections raised while validating a match configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("arena is empty or inverted (left {left}, right {right})")]
    InvalidArena { left: f64, right: f64 },

    #[error("{side:?} spawn x {x} does not fit inside the arena")]
    SpawnOutsideArena { side: Side, x: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositiveDuration { field: &'static str, value: f64 },

    #[error("rounds to win must be at least 1")]
    NoRoundsToWin,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
