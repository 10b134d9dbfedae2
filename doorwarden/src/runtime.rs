//! Wiring helpers that connect credential storage, provider adapters,
//! and the game manager.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

use ggame::{CredentialStore, GameManager, GameRuntimeHooks, StoreError};
use gobserve::TracingGameHooks;
use gprovider::{ChatProvider, ProviderError, ProviderId, create_provider};
use gstore::SqliteGameStore;
use reqwest::Client;

/// Failure while wiring a runtime: either the backend rejected
/// something or storage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    Provider(ProviderError),
    Store(StoreError),
}

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(error) => write!(f, "provider: {error}"),
            Self::Store(error) => write!(f, "store: {error}"),
        }
    }
}

impl Error for SetupError {}

impl From<ProviderError> for SetupError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<StoreError> for SetupError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Builds the adapter for `provider_id` if a usable credential is on
/// file. `Ok(None)` means no game can start until the player saves a
/// key in settings.
pub async fn configured_provider(
    provider_id: ProviderId,
    credentials: &dyn CredentialStore,
    client: Client,
) -> Result<Option<Arc<dyn ChatProvider>>, StoreError> {
    let Some(api_key) = credentials.load_credential(provider_id).await? else {
        return Ok(None);
    };

    let provider = create_provider(provider_id, client);
    if provider.configure(&api_key).is_err() {
        // A blank stored key is the same as no key.
        return Ok(None);
    }

    Ok(Some(provider))
}

/// Validate-then-save: the key is persisted only after the backend's
/// probe accepts it. Returns whether the key was accepted.
pub async fn validate_and_save_credential(
    provider: &dyn ChatProvider,
    provider_id: ProviderId,
    api_key: &str,
    credentials: &dyn CredentialStore,
) -> Result<bool, SetupError> {
    provider.configure(api_key)?;

    let accepted = provider.validate_credential().await?;
    if accepted {
        credentials.save_credential(provider_id, api_key).await?;
    }

    Ok(accepted)
}

/// Knobs for [`build_game_manager`]. Defaults to an in-memory database
/// and tracing hooks.
pub struct GameBuildConfig {
    provider_id: ProviderId,
    database_path: Option<PathBuf>,
    hooks: Arc<dyn GameRuntimeHooks>,
}

impl GameBuildConfig {
    pub fn new(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            database_path: None,
            hooks: Arc::new(TracingGameHooks),
        }
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn GameRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }
}

/// A fully wired game: the manager, the adapter it will talk through,
/// and the shared store for settings screens.
pub struct GameRuntime {
    pub manager: GameManager,
    pub provider: Arc<dyn ChatProvider>,
    pub store: Arc<SqliteGameStore>,
}

/// Opens storage, resolves the saved credential, and assembles a game
/// manager. `Ok(None)` mirrors [`configured_provider`]: no credential,
/// nothing to play with yet.
pub async fn build_game_manager(
    config: GameBuildConfig,
    client: Client,
) -> Result<Option<GameRuntime>, SetupError> {
    let store = Arc::new(match &config.database_path {
        Some(path) => SqliteGameStore::new(path)?,
        None => SqliteGameStore::new_in_memory()?,
    });

    let Some(provider) =
        configured_provider(config.provider_id, store.as_ref(), client).await?
    else {
        return Ok(None);
    };

    let manager = GameManager::new(store.clone()).with_hooks(config.hooks);
    Ok(Some(GameRuntime {
        manager,
        provider,
        store,
    }))
}
