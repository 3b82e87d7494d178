//! Local git plumbing for assembling audit repositories
//!
//! Everything here shells out to the `git` binary rather than linking a
//! git library: subtree merges in particular only exist as a contrib
//! script, and matching the CLI keeps failures reproducible by hand.

pub mod actions;
pub mod credentials;
pub mod run;
pub mod submodules;
pub mod subtree;
pub mod workspace;

pub use actions::CiStripPolicy;
pub use credentials::CredentialGuard;
pub use run::GitResult;
pub use subtree::{MergedSource, SubtreeMerger};
pub use workspace::Workspace;
