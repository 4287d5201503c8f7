pub mod character;
pub mod task;
pub mod reward;
pub mod completion;

pub use character::{Character, Stats, MAX_HEALTH, MIN_HEALTH};
pub use task::{Assignment, Schedule, Task};
pub use reward::Reward;
pub use completion::TaskCompletion;
