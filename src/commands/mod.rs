pub mod build;
pub mod clean;
pub mod project;
pub mod pull;
pub mod watch;
