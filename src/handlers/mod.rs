pub mod agents;
pub mod generate;
pub mod health;
pub mod posts;
pub mod rituals;
pub mod vault;
