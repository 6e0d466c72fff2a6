//! Selector validation error types

/// Errors from validating the user-supplied measurement selector.
///
/// All of these are raised before any network or filesystem access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No job id was supplied.
    #[error("a job id is required")]
    MissingJobId,

    /// A metric was requested without naming its group.
    #[error("'metric' must be empty when 'group' is not set")]
    MetricWithoutGroup,

    /// Node-level aggregation was requested without naming a node.
    #[error("'node' must be provided when level is 'node'")]
    MissingNodeForNodeLevel,
}
