pub mod assistant;
pub mod export;
pub mod flow;
pub mod flowchart;
pub mod subtask;
pub mod task;
pub mod voice_task;
