//! Classification of external tool stderr.
//!
//! The platform and git CLIs signal recoverable conditions through free-form
//! stderr text. Matching is kept in pure functions so the step logic stays
//! trivially testable.

/// App creation failed because the requested name is already in use.
///
/// Recoverable: the naming step links the local repository to the existing
/// app instead of failing.
pub fn name_taken(stderr: &str) -> bool {
    stderr.contains("already exists") || stderr.contains("is already taken")
}

/// Push failed because the local branch has no matching remote ref.
///
/// Recoverable: the deploy step retries once against the conventional
/// fallback branch name.
pub fn missing_ref(stderr: &str) -> bool {
    stderr.contains("no refspec matches") || stderr.contains("no matching")
}

/// The stderr text mentions an error at all (case-insensitive).
pub fn mentions_error(stderr: &str) -> bool {
    stderr.to_lowercase().contains("error")
}
