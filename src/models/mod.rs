// src/models/mod.rs

pub mod lesson;
pub mod principal;
pub mod quiz;
pub mod quiz_result;
