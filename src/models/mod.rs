// src/models/mod.rs

pub mod content;
