pub mod app;
pub mod config;
pub mod errors;
pub mod favorites;
pub mod filters;
pub mod history;
pub mod models;
pub mod omdb;
pub mod pagination;
pub mod preferences;
pub mod retry;
pub mod session;
pub mod storage;
