use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::FactChecker;

pub struct AppState<S, P, E> {
    pub checker: Arc<FactChecker<S, P, E>>,

    pub index_path: PathBuf,

    /// `"remote"` or `"stub"`.
    pub embedder_mode: &'static str,

    /// `"model"` or `"stub"`.
    pub encoder_mode: &'static str,
}

impl<S, P, E> Clone for AppState<S, P, E> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
            index_path: self.index_path.clone(),
            embedder_mode: self.embedder_mode,
            encoder_mode: self.encoder_mode,
        }
    }
}

impl<S, P, E> AppState<S, P, E> {
    pub fn new(checker: Arc<FactChecker<S, P, E>>, index_path: PathBuf) -> Self {
        Self {
            checker,
            index_path,
            embedder_mode: "remote",
            encoder_mode: "model",
        }
    }

    pub fn with_modes(mut self, embedder_stub: bool, encoder_stub: bool) -> Self {
        self.embedder_mode = if embedder_stub { "stub" } else { "remote" };
        self.encoder_mode = if encoder_stub { "stub" } else { "model" };
        self
    }
}
