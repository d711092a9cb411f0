pub mod addon;
pub mod airport;
pub mod config;
pub mod discover;
pub mod format;
pub mod manifest;
