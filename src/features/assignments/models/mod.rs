mod assignment;
mod lifecycle;

pub use assignment::{
    Assignment, AssignmentFilter, AssignmentPriority, AssignmentStatus, CreateAssignment,
};
pub use lifecycle::{AssignmentAction, TransitionError, TransitionPolicy};
