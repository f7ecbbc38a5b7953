//! File store adapters

mod github;
mod vault;

pub use github::GitHubStore;
pub use vault::VaultStore;
