// Utilities for storage module
pub mod path;
pub mod progress;
pub mod size;
