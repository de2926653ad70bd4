//! Infrastructure shared by the login server: command line and environment
//! configuration, and console logging.

pub mod config;
pub mod logging;
