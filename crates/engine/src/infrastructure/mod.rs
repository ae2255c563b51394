//! Infrastructure - external dependency implementations (ports + adapters).

pub mod graphql;
pub mod host_log;
pub mod ports;
pub mod settings;
