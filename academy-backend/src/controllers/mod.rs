pub mod analytics;
pub mod contact;
pub mod health;
pub mod robots;
