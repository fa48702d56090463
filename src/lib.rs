//! folga: rest-leave cycle tracking for field workers.
//!
//! The engine keeps a cached "last rest end" per worker, classifies how far
//! each worker is into the current work cycle, and projects the ongoing work
//! span for calendar rendering.

pub mod engine;
