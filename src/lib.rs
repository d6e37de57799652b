pub mod api;
pub mod config;
pub mod model;
pub mod notify;
pub mod poller;
pub mod validate;
