//! Core engine modules for folga.

pub mod clock;
pub mod config;
pub mod cycle;
pub mod db;
pub mod error;
pub mod fuzzy;
pub mod projection;
pub mod repo;
pub mod resolver;
pub mod status;
pub mod types;
pub mod views;
