//! Native BookWorm client: HTTP transport, file-backed session and
//! environment configuration for the `bookworm` command-line front end.

pub mod config;
pub mod http;
pub mod store;

use std::path::Path;

use anyhow::Context;
use bookworm_shared::draft::ImageAttachment;
use bookworm_shared::session::SessionService;
use bookworm_shared::ClientError;

pub use config::Config;
pub use http::HttpApi;
pub use store::FileStore;

/// Transport and session wired together from one [`Config`].
pub struct App {
    pub config: Config,
    pub api: HttpApi,
    pub session: SessionService<FileStore>,
}

impl App {
    /// # Errors
    ///
    /// Fails when the session file is unreadable or the HTTP client cannot
    /// be built.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let api = HttpApi::from_config(&config)?;
        let store = FileStore::open(&config.session_file)?;
        let session = SessionService::new(store).with_policy(config.unauthorized_policy());
        Ok(Self {
            config,
            api,
            session,
        })
    }
}

/// Read a cover image from disk, keeping the I/O error in the chain.
pub async fn read_image(path: &Path) -> anyhow::Result<ImageAttachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImageAttachment::from_file_name(&path.to_string_lossy(), bytes))
}
