pub mod docs;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
