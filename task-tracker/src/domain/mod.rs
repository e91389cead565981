// src/domain/mod.rs
pub mod task_model;
