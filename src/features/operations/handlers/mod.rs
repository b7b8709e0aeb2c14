pub mod operation_handler;

pub use operation_handler::*;
