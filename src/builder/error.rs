//! Build errors for the registry builder.

use crate::registry::RegistryViolation;
use thiserror::Error;

/// Errors that can occur when building a registry in checked mode.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Registry has {} problem(s): {}", .0.len(), describe(.0))]
    Invalid(Vec<RegistryViolation>),
}

fn describe(violations: &[RegistryViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
