//! State

use std::{path::PathBuf, sync::Arc};

use bazaar_app::context::AppContext;

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Where uploaded images are written.
    pub(crate) upload_dir: PathBuf,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, upload_dir: PathBuf) -> Self {
        Self { app, upload_dir }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, upload_dir: PathBuf) -> Arc<Self> {
        Arc::new(Self::new(app, upload_dir))
    }
}
