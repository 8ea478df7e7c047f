//! Library exports for personalchat-auth, shared between the binary and tests.

pub mod config;
pub mod controller;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
pub mod verifiers;
