//! Users Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState, AuthStore};
use crate::presentation::middleware::require_bearer_token;

/// Create the users router with PostgreSQL repository
pub fn users_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    users_router_generic(repo, config)
}

/// Create the users router for any repository implementation
pub fn users_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let public = Router::new()
        .route("/users", post(handlers::register::<R>))
        .route("/users/authenticate", post(handlers::authenticate::<R>))
        .route("/users/forgot-password", post(handlers::forgot_password::<R>))
        .route("/users/reset-password", post(handlers::reset_password::<R>));

    let protected = Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/me", get(handlers::me::<R>))
        .route(
            "/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<R>,
        ));

    public.merge(protected).with_state(state)
}
