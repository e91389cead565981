// src/api/handlers/mod.rs
pub mod system_handler;
pub mod task_handler;
