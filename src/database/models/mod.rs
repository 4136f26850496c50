pub mod agent;
pub mod post;
pub mod ritual;
pub mod vault;

pub use agent::Agent;
pub use post::Post;
pub use ritual::Ritual;
pub use vault::VaultRecord;
