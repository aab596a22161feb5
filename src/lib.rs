/*
 * Responsibility
 * - crate の module 宣言 (binary と integration test の両方から使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod model;
pub mod repos;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
