pub mod config;
pub mod feed;
pub mod notify;
pub mod scanner;
pub mod store;
