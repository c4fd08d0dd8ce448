//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the request flow so route handlers stay focused on
//! protocol translation: extracting the client key, mapping errors to
//! status codes and shaping JSON bodies.

pub mod render;
