//! Repository interfaces (ports) and their in-memory test doubles.

pub mod profile;
pub mod token_store;

pub use profile::{MockProfileRepository, ProfileRepository};
pub use token_store::{MockTokenStore, TokenStore};
