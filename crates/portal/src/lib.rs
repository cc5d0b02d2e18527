//! BSM Portal library.
//!
//! This crate provides the portal server as a library, allowing it to be
//! tested in-process and reused.
//!
//! The portal resolves a visitor's session against the hosted auth service
//! and routes them to the admin dashboard, the customer dashboard, the login
//! surface or the access guard. The decision itself lives in `bsm-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
