pub mod assign;
pub mod transition;

pub const BLOCKED: &str = "Blocked";
pub const TO_DO: &str = "To Do";
pub const IN_PROGRESS: &str = "In Progress";
pub const IN_REVIEW: &str = "Review";
pub const DONE: &str = "Done";
