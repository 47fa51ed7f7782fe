//! # Workboard API Server Library
//!
//! HTTP surface of Workboard: routing, request validation, the workspace
//! authorization gate and error mapping. Business logic lives in
//! `workboard-shared`.
//!
//! ## Modules
//!
//! - `access`: Endpoint permission table and the workspace gate middleware
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod access;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
