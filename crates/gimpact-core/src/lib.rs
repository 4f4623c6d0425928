//! gimpact-core
//!
//! Request/response models, the analysis data document and text budgets.
//! Shared by the renderer and the HTTP service; no rendering code lives here.

pub mod data;
pub mod error;
pub mod models;
pub mod sample;
pub mod text;
