mod operation_dto;

pub use operation_dto::*;
