pub mod config;
pub mod init;
pub mod link;
pub mod log;
pub mod run;
pub mod status;
