pub mod action_executor;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod exec;
pub mod logging;
pub mod model;
pub mod query_dsl;
pub mod runtime;
pub mod search;
pub mod search_command;
pub mod shell_quote;
pub mod transport;
pub mod truncate;
pub mod warmup;
