use thiserror::Error;

/// Errors surfaced by the fleet API
///
/// Everything that can go wrong mid-order (lost targets, degenerate facings)
/// is absorbed by the orders themselves; these cover bad requests only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FleetError {
    #[error("Agent not found: {id}")]
    UnknownAgent { id: u64 },

    #[error("Order target not found: {id}")]
    UnknownTarget { id: u64 },

    #[error("Invalid kinematics: linear speed {linear}, angular speed {angular} (both must be finite and positive)")]
    InvalidKinematics { linear: f64, angular: f64 },
}

pub type FleetResult<T> = Result<T, FleetError>;
