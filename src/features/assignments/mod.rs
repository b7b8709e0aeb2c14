pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use models::TransitionPolicy;
pub use repositories::PgAssignmentRepository;
pub use services::AssignmentService;
