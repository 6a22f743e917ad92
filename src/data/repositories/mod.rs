pub mod activity;
pub mod attempt;
pub mod sentence;
pub mod simulation;
pub mod unseen;
pub mod user;
pub mod word;

pub use activity::ActivityRepository;
pub use attempt::AttemptRepository;
pub use sentence::SentenceRepository;
pub use simulation::SimulationRepository;
pub use unseen::PassageRepository;
pub use user::UserRepository;
pub use word::{WordFilter, WordRepository};
