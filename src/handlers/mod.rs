pub mod activity;
pub mod auth;
pub mod progress;
pub mod quiz;
pub mod sentences;
pub mod simulation;
pub mod unseen;
pub mod words;
