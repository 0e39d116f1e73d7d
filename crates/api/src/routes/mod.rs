pub mod health;
pub mod sheets;
