//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod subtask_repo;
pub mod task_repo;

pub use subtask_repo::SubtaskRepo;
pub use task_repo::TaskRepo;
