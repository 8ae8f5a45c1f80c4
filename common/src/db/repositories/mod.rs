// Repository layer for database operations

pub mod execution;
pub mod queries;
pub mod reference;
pub mod schedule;

pub use execution::ExecutionRepository;
pub use reference::ReferenceRepository;
pub use schedule::ScheduleRepository;
