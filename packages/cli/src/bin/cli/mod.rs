pub mod customers;
pub mod dashboard;
pub mod deals;
pub mod tasks;
pub mod utils;
