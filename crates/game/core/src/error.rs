//! Common error infrastructure for mim-core.
//!
//! Domain-specific errors (`StateError`, `ActionError`) live beside the code
//! that raises them. This module provides the shared classification used by
//! callers to decide whether a failure is an input problem or a broken
//! simulation invariant.
//!
//! Domain infeasibility is never an error: actions report it through their
//! feasibility check and are simply not generated.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry with different input.
    Recoverable,

    /// Validation error - malformed world description or arguments.
    ///
    /// Examples: duplicate level id, too few NPC slots for a respawn.
    Validation,

    /// Internal error - the simulation model reached an impossible state.
    ///
    /// Examples: a generated action refers to a missing koopa, the two-target
    /// intercept solver exhausts every bounce escalation.
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - world state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all mim-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
