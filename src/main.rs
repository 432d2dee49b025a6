use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use parcel_tracker::{
    AppState,
    config::Config,
    middleware::{RateLimiter, log_errors, rate_limit},
    routes, ups,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // UPS 凭据缺失属于启动期错误
    let missing = config.ups.missing_credentials();
    if !missing.is_empty() {
        tracing::error!("Missing UPS credentials: {}", missing.join(", "));
        std::process::exit(1);
    }

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'parcel_tracker';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // 设置 Redis 客户端
    let redis = Arc::new(
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client"),
    );

    // UPS 令牌缓存和查询客户端，进程内唯一
    let ups = ups::build_tracking_client(&config.ups).expect("Failed to build UPS HTTP client");

    let state = AppState {
        pool,
        config: config.clone(),
        redis: redis.clone(),
        ups: Arc::new(ups),
    };

    let rate_limiter = Arc::new(RateLimiter::new(redis, config.clone()));

    // 添加日志中间件和限流中间件
    let router = routes::app_router(state)
        .layer(axum::middleware::from_fn(log_errors))
        .layer(axum::middleware::from_fn_with_state(rate_limiter, rate_limit));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
