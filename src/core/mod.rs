// src/core/mod.rs

pub mod converter;
pub mod engine;
pub mod mapping;
pub mod types;
