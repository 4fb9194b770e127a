//! Movie recommendation service.
//!
//! Loads a movie catalog (and, when available, user ratings) once at startup
//! and serves top-N recommendations for three favourite movies using either
//! content-based or collaborative filtering.

pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
