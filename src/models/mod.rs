pub mod advisory_types;
pub mod category;
pub mod classify_types;
pub mod fs_types;
pub mod session_types;
