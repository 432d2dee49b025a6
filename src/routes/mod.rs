use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::{AppState, middleware::auth_middleware};

pub mod health;
pub mod invite;
pub mod tracking;
pub mod ups;
pub mod user;

/// 创建业务路由，限流、日志和 CORS 由 main 叠加
pub fn app_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(health::ping))
        .route("/users/register", post(user::register))
        .route("/users/login", post(user::login));

    let protected_routes = Router::new()
        .route("/users/me", get(user::me))
        .route("/invites/generate", post(invite::generate))
        .route(
            "/trackings",
            get(tracking::list)
                .post(tracking::create)
                .delete(tracking::delete),
        )
        .route("/ups/track", post(ups::track))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new().merge(public_routes).merge(protected_routes);

    // axum 不支持在根路径 nest
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router.with_state(state)
}
