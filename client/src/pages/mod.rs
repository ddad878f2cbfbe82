//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page validates its own form input, drives the shared controller, and
//! publishes the resulting snapshot. Navigation after success is the
//! controller's job, not the page's.

pub mod dashboard;
pub mod signin;
pub mod signup;
