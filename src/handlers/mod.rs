pub mod archive;
pub mod archived;
pub mod board;
pub mod cancel;
pub mod events;
pub mod hire;
pub mod init;
pub mod move_rest;
pub mod reconcile;
pub mod resources;
pub mod rest;
pub mod why;
