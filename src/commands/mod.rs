//! Command implementations

pub mod append;
pub mod branch;
pub mod compress;
pub mod dispatch;
pub mod helpers;
pub mod init;
pub mod pass;
pub mod prune;
pub mod render;
pub mod show;
pub mod status;
pub mod targets;
pub mod unlink;
pub mod validate;
pub mod watch;
