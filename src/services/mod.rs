// src/services/mod.rs

pub mod access;
pub mod analytics;
pub mod grading;
