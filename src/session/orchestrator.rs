//! Authentication orchestrator.
//!
//! Owns the only mutable session state in the application: which adapter is
//! active and the provider handle of the authenticated session. All console
//! actions go through here.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapter::{
    build_adapter, AdapterError, AdapterKind, ConnectParams, ProviderHandle, UserInfo,
    WalletAdapter,
};
use crate::config::schema::{AppConfig, ChainConfig};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another login attempt currently owns the session slot.
    #[error("a login attempt is already in flight")]
    LoginInFlight,

    /// The operation needs an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The attempt finished after being abandoned by a logout.
    #[error("login attempt was superseded before it completed")]
    Superseded,

    /// Adapter-side failure (construction, init, connect, logout, user info).
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// An established session: the adapter that produced it plus its handle.
struct Session {
    attempt: Uuid,
    adapter: Box<dyn WalletAdapter>,
    handle: Arc<ProviderHandle>,
}

/// Lifecycle of the single session slot.
enum SessionState {
    Disconnected,
    Connecting { attempt: Uuid },
    Authenticated(Session),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting { .. } => "connecting",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// Owner of the session slot. One instance per application.
pub struct AuthOrchestrator {
    config: Arc<AppConfig>,
    chain: ChainConfig,
    state: Mutex<SessionState>,
}

impl AuthOrchestrator {
    /// Create an orchestrator bound to one chain.
    pub fn new(config: Arc<AppConfig>, chain: ChainConfig) -> Self {
        Self {
            config,
            chain,
            state: Mutex::new(SessionState::Disconnected),
        }
    }

    /// The chain this orchestrator targets.
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Log in through the adapter of the given kind.
    ///
    /// Unified entry point for every login trigger: constructs the adapter
    /// from configuration, initializes it, then connects. Rejects with
    /// [`SessionError::LoginInFlight`] while another attempt owns the slot.
    /// An authenticated session is overwritten: its adapter is logged out
    /// best-effort before the new connect.
    pub async fn login(
        &self,
        kind: AdapterKind,
        params: ConnectParams,
    ) -> Result<Arc<ProviderHandle>, SessionError> {
        let adapter = build_adapter(kind, &self.config)?;
        self.login_with(adapter, params).await
    }

    /// Log in through a caller-supplied adapter.
    ///
    /// Split out from [`login`](Self::login) so tests can drive the state
    /// machine with fake adapters.
    pub async fn login_with(
        &self,
        mut adapter: Box<dyn WalletAdapter>,
        params: ConnectParams,
    ) -> Result<Arc<ProviderHandle>, SessionError> {
        let attempt = Uuid::new_v4();

        // Claim the slot. No awaits inside this critical section.
        let prior = {
            let mut state = self.state.lock().await;
            if matches!(*state, SessionState::Connecting { .. }) {
                return Err(SessionError::LoginInFlight);
            }
            std::mem::replace(&mut *state, SessionState::Connecting { attempt })
        };

        // A new login overwrites a prior session rather than composing with
        // it. Its logout failure must not block the new attempt.
        if let SessionState::Authenticated(mut old) = prior {
            info!(kind = %adapter.kind(), "Replacing existing session");
            if let Err(e) = old.adapter.logout().await {
                warn!(error = %e, "Logout of replaced session failed");
            }
        }

        info!(%attempt, kind = %adapter.kind(), chain_id = self.chain.chain_id, "Login started");

        let connect_result = async {
            adapter.init(&self.chain).await?;
            adapter.connect(&params).await
        }
        .await;

        let mut state = self.state.lock().await;
        let owns_slot =
            matches!(*state, SessionState::Connecting { attempt: a } if a == attempt);

        match connect_result {
            Ok(handle) => {
                if !owns_slot {
                    // A logout abandoned this attempt while it was in flight;
                    // the cleared state wins and the late handle is dropped.
                    warn!(%attempt, "Login completed after being abandoned; discarding handle");
                    return Err(SessionError::Superseded);
                }
                let handle = Arc::new(handle);
                info!(%attempt, "Login succeeded");
                *state = SessionState::Authenticated(Session {
                    attempt,
                    adapter,
                    handle: Arc::clone(&handle),
                });
                Ok(handle)
            }
            Err(e) => {
                if owns_slot {
                    *state = SessionState::Disconnected;
                }
                warn!(%attempt, error = %e, "Login failed");
                Err(SessionError::Adapter(e))
            }
        }
    }

    /// End the current session.
    ///
    /// A no-op when disconnected. During a connect, abandons the in-flight
    /// attempt so its handle is discarded on arrival. When authenticated,
    /// the adapter logout is awaited; the slot is cleared even if it fails.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let prior = {
            let mut state = self.state.lock().await;
            std::mem::replace(&mut *state, SessionState::Disconnected)
        };

        match prior {
            SessionState::Disconnected => {
                info!("Logout requested with no active session");
                Ok(())
            }
            SessionState::Connecting { attempt } => {
                info!(%attempt, "Logout abandoned an in-flight login attempt");
                Ok(())
            }
            SessionState::Authenticated(mut session) => {
                info!(attempt = %session.attempt, "Logging out");
                session.adapter.logout().await.map_err(SessionError::Adapter)
            }
        }
    }

    /// Profile information for the authenticated session.
    pub async fn user_info(&self) -> Result<UserInfo, SessionError> {
        let state = self.state.lock().await;
        match &*state {
            SessionState::Authenticated(session) => {
                Ok(session.adapter.user_info().await?)
            }
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    /// The provider handle of the authenticated session, if any.
    ///
    /// Its presence is the sole discriminator the console's view uses.
    pub async fn provider(&self) -> Option<Arc<ProviderHandle>> {
        let state = self.state.lock().await;
        match &*state {
            SessionState::Authenticated(session) => Some(Arc::clone(&session.handle)),
            _ => None,
        }
    }

    /// Whether a session is currently authenticated.
    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock().await, SessionState::Authenticated(_))
    }

    /// Name of the current state, for the console prompt and logs.
    pub async fn state_name(&self) -> &'static str {
        self.state.lock().await.name()
    }
}
