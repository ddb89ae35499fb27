//! HTTP front-end subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, limits, trace)
//!     → pages.rs (form handling, session cookie)
//!     → flow (provider calls)
//!     → views.rs (HTML rendering)
//!     → Send to client
//! ```

pub mod pages;
pub mod server;
pub mod views;

pub use server::{AppState, HttpServer};
