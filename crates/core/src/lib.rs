//! Domain logic shared by the VoicePath API and storage layers.
//!
//! Pure functions and types only: step parsing, step diagrams, progress
//! export, focus sessions, and interpretation of model output.

pub mod error;
pub mod extraction;
pub mod flow;
pub mod flowchart;
pub mod focus;
pub mod progress;
pub mod steps;
pub mod task;
pub mod types;
