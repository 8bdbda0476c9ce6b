pub mod app;
pub mod cache;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod hooks;
pub mod mail;
pub mod middleware;
pub mod migrator;
pub mod models;
pub mod pricing;
pub mod query;
pub mod response;
pub mod routes;
pub mod services;
pub mod slugs;
pub mod state;
