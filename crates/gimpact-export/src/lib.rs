//! gimpact-export
//!
//! Lays out G-IMPACT analysis reports and writes them as PDF.

pub mod builder;
pub mod canvas;
pub mod charts;
pub mod decorators;
pub mod element;
pub mod error;
pub mod fonts;
pub mod markup;
pub mod pdf;
pub mod render;
pub mod styles;
pub mod tables;

pub use error::ExportError;
pub use fonts::FontLibrary;
pub use pdf::RenderedPdf;
pub use render::{generate_detail_report, generate_summary_report};
