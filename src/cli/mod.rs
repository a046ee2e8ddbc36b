//! Command-line surface
//!
//! The binary takes a single positional argument naming the version
//! component to bump; everything else comes from [crate::config].

pub mod orchestration;

use crate::version::Component;

/// Accepted spellings of the bump kind, in help order
pub const BUMP_KINDS: [&str; 6] = ["major", "minor", "patch", "0", "1", "2"];

/// Parses the bump kind argument.
///
/// Accepts the component names `major`, `minor`, `patch` or their indices
/// `0`, `1`, `2`. Anything else is rejected.
pub fn parse_bump_kind(input: &str) -> Result<Component, String> {
    match input {
        "major" | "0" => Ok(Component::Major),
        "minor" | "1" => Ok(Component::Minor),
        "patch" | "2" => Ok(Component::Patch),
        other => Err(format!(
            "invalid change type '{}' (expected one of: {})",
            other,
            BUMP_KINDS.join(", ")
        )),
    }
}
