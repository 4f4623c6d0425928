use std::sync::Arc;

use gimpact_export::FontLibrary;

use crate::config::ServerConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub fonts: Arc<FontLibrary>,
}

impl AppState {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }

    /// Load the report fonts named by `config`. An explicit font path that
    /// cannot be loaded falls back to the directory search, which in turn
    /// falls back to the standard fonts.
    pub fn from_config(config: &ServerConfig) -> Self {
        if let Some(path) = &config.font_path {
            match FontLibrary::load(path, config.font_bold_path.as_deref()) {
                Ok(fonts) => {
                    tracing::info!(path = %path.display(), "loaded configured report font");
                    return Self::new(fonts);
                }
                Err(e) => tracing::warn!(error = %e, "configured font unusable, searching font directories"),
            }
        }
        Self::new(FontLibrary::discover(&config.font_dirs))
    }
}
