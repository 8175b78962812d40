//! Verdict endpoint and service wiring.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use hyauth_auth::{
    AccountStore, AuthRequest, Authenticator, AuthenticatorConfig, CredentialCache,
    ExpiredDatePolicy, FileStore, HttpStore, Verdict, VerdictService, spawn_refresher,
};
use hyauth_config::{AuthConfig, Config, StoreConfig};
use hyauth_core::AUTH_PATH;
use hyauth_metrics::{
    record_bad_request, record_denial, record_refresh, record_verdict, record_verdict_duration,
    set_accounts,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ServerError;

/// Body of a verdict request sent by the proxy.
///
/// Only `auth` is required. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerdictRequest {
    /// Client address, informational.
    #[serde(default)]
    pub addr: Option<String>,
    /// Credential string, `identity:secret`.
    #[serde(default)]
    pub auth: Option<String>,
    /// Transfer counter hint, ignored by the engine.
    #[serde(default)]
    pub tx: Option<u64>,
}

/// Body of every verdict response.
///
/// `id` is empty on deny, so all denials serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub ok: bool,
    pub id: String,
}

impl From<Verdict> for VerdictResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            ok: verdict.allowed,
            id: verdict.identity.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<dyn VerdictService>,
}

/// Build the router exposing `POST /auth`.
///
/// Other methods on the route get 405 and count as bad requests.
pub fn router(service: Arc<dyn VerdictService>) -> Router {
    Router::new()
        .route(AUTH_PATH, post(handle_auth))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(AppState { service })
}

async fn method_not_allowed() -> Response {
    record_bad_request();
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

async fn handle_auth(State(state): State<AppState>, body: Bytes) -> Response {
    let body: VerdictRequest = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            record_bad_request();
            debug!(error = %e, "undecodable verdict request");
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }
    };
    let Some(auth) = body.auth else {
        record_bad_request();
        debug!("verdict request without auth");
        return (StatusCode::BAD_REQUEST, "bad request").into_response();
    };

    let request = AuthRequest {
        addr: body.addr.unwrap_or_default(),
        auth,
        tx: body.tx.unwrap_or_default(),
    };

    let start = Instant::now();
    let decision = state.service.decide(&request).await;
    if let Err(denial) = &decision {
        record_denial(denial.label());
    }
    let verdict = Verdict::from(decision);
    record_verdict(verdict.allowed);
    record_verdict_duration(start.elapsed().as_secs_f64());

    Json(VerdictResponse::from(verdict)).into_response()
}

/// Serve the verdict endpoint on `listener` until `shutdown` is cancelled.
///
/// In-flight requests get up to `drain` to finish after cancellation.
pub async fn serve(
    listener: TcpListener,
    service: Arc<dyn VerdictService>,
    shutdown: CancellationToken,
    drain: Duration,
) -> Result<(), ServerError> {
    let server = axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = shutdown.cancelled() => {
            info!("shutdown signal received, draining in-flight requests");
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout_secs = drain.as_secs(),
                    "shutdown timeout, dropping in-flight requests"
                ),
            }
        }
    }
    Ok(())
}

/// Build the account store described by `config`.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn AccountStore>, ServerError> {
    match config.kind.as_str() {
        "file" => Ok(Arc::new(FileStore::new(&config.path))),
        "http" => {
            let url = config.url.clone().ok_or_else(|| {
                ServerError::Config("store.url is required for the http store".into())
            })?;
            let store = HttpStore::with_timeout(
                url,
                config.token.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(store))
        }
        other => Err(ServerError::Config(format!("unknown store kind '{other}'"))),
    }
}

/// Map the `[auth]` section onto engine settings.
pub fn authenticator_config(config: &AuthConfig) -> Result<AuthenticatorConfig, ServerError> {
    let expired_date_policy = match config.expired_date_policy.as_str() {
        "fail-open" => ExpiredDatePolicy::FailOpen,
        "fail-closed" => ExpiredDatePolicy::FailClosed,
        other => {
            return Err(ServerError::Config(format!(
                "unknown expired_date_policy '{other}'"
            )));
        }
    };
    Ok(AuthenticatorConfig {
        mismatch_delay: Duration::from_millis(config.mismatch_delay_ms),
        expired_date_policy,
    })
}

/// Run the verdict service with a cancellation token for graceful shutdown.
///
/// Loads the initial snapshot, starts the refresh task, and serves until
/// `shutdown` is cancelled.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listen: SocketAddr = config
        .server
        .listen
        .trim()
        .parse()
        .map_err(|_| ServerError::Config("invalid listen address".into()))?;
    if !listen.ip().is_loopback() {
        return Err(ServerError::Config(format!(
            "listen address {listen} is not loopback"
        )));
    }
    let engine_config = authenticator_config(&config.auth)?;
    let store = build_store(&config.store)?;

    let cache = Arc::new(CredentialCache::load_initial(store.as_ref()).await);
    set_accounts(cache.len());

    // Stops the refresher when serving ends, even if the caller never cancels.
    let tasks = shutdown.child_token();
    let refresher = {
        let cache = cache.clone();
        spawn_refresher(
            cache.clone(),
            store,
            Duration::from_secs(config.store.refresh_interval_secs),
            tasks.clone(),
            move |ok| {
                record_refresh(ok);
                if ok {
                    set_accounts(cache.len());
                }
            },
        )
    };

    #[cfg(unix)]
    crate::signal::spawn_reload_handler(refresher.trigger_handle(), tasks.clone());

    info!(
        mismatch_delay_ms = config.auth.mismatch_delay_ms,
        expired_date_policy = %config.auth.expired_date_policy,
        "decision engine ready"
    );
    let service: Arc<dyn VerdictService> = Arc::new(Authenticator::new(cache, engine_config));

    let listener = TcpListener::bind(listen).await?;
    info!(address = %listener.local_addr()?, path = AUTH_PATH, "listening");

    let result = serve(
        listener,
        service,
        shutdown,
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await;

    tasks.cancel();
    refresher.join().await;
    info!("server stopped");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_decoding() {
        let req: VerdictRequest =
            serde_json::from_str(r#"{"addr":"1.2.3.4:5","auth":"alice:pw1","tx":0}"#).unwrap();
        assert_eq!(req.auth.as_deref(), Some("alice:pw1"));
        assert_eq!(req.addr.as_deref(), Some("1.2.3.4:5"));

        let req: VerdictRequest = serde_json::from_str(r#"{"auth":null,"extra":true}"#).unwrap();
        assert!(req.auth.is_none());

        assert!(serde_json::from_str::<VerdictRequest>(r#"{"auth":42}"#).is_err());
    }

    #[test]
    fn response_shape() {
        let allow = serde_json::to_string(&VerdictResponse::from(Verdict::allow("alice"))).unwrap();
        assert_eq!(allow, r#"{"ok":true,"id":"alice"}"#);

        let deny = serde_json::to_string(&VerdictResponse::from(Verdict::deny())).unwrap();
        assert_eq!(deny, r#"{"ok":false,"id":""}"#);
    }

    #[test]
    fn store_selection() {
        let mut cfg = StoreConfig::default();
        let store = build_store(&cfg).unwrap();
        assert!(store.describe().starts_with("file:"));

        cfg.kind = "http".into();
        assert!(matches!(build_store(&cfg), Err(ServerError::Config(_))));

        cfg.url = Some("http://127.0.0.1:1/users".into());
        build_store(&cfg).unwrap();

        cfg.kind = "ldap".into();
        assert!(matches!(build_store(&cfg), Err(ServerError::Config(_))));
    }

    #[test]
    fn engine_settings_from_config() {
        let mut cfg = AuthConfig::default();
        let engine = authenticator_config(&cfg).unwrap();
        assert_eq!(engine.mismatch_delay, Duration::from_secs(5));
        assert_eq!(engine.expired_date_policy, ExpiredDatePolicy::FailOpen);

        cfg.expired_date_policy = "fail-closed".into();
        cfg.mismatch_delay_ms = 0;
        let engine = authenticator_config(&cfg).unwrap();
        assert!(engine.mismatch_delay.is_zero());
        assert_eq!(engine.expired_date_policy, ExpiredDatePolicy::FailClosed);

        cfg.expired_date_policy = "maybe".into();
        assert!(authenticator_config(&cfg).is_err());
    }

    #[tokio::test]
    async fn listen_address_is_trimmed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut cfg = Config::default();
        cfg.server.listen = format!(" 127.0.0.1:{port} ");
        cfg.store.path = "/nonexistent/hyauth-users.json".into();
        hyauth_config::validate_config(&cfg).unwrap();

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        run_with_shutdown(cfg, shutdown).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_non_loopback_listen() {
        let mut cfg = Config::default();
        cfg.server.listen = "0.0.0.0:0".into();
        let err = run_with_shutdown(cfg, CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
