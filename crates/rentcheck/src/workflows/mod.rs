pub mod investment;
pub mod listings;
