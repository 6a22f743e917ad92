pub mod errors;
pub mod example;
pub mod quiz;
pub mod scheduler;
pub mod stats;
pub mod tracker;
