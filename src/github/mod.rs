// src/github/mod.rs
// =============================================================================
// Everything that talks to, or models, the GitHub REST API.
//
// Submodules:
// - identifier: owner/repo parsing of user input
// - types: wire types and the values handed to the rest of the program
// - decode: the single base64 decode step for file bodies
// - gateway: the ContentSource trait and its HTTP implementation
// =============================================================================

mod decode;
mod gateway;
mod identifier;
mod types;

pub use gateway::{ContentSource, GithubGateway};
pub use identifier::{parse_repo_identifier, RepoRef};
pub use types::{EntryKind, FileContent, RawEntry, RepositoryMetadata};
