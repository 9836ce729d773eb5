use anyhow::Context as _;
use sea_orm::Database;
use tonic::transport::Channel;
use tracing::info;

use fitfusion_core::tracing::init_tracing;
use fitfusion_proto::cascade::cascade_service_server::CascadeServiceServer;

use fitfusion_cascade::config::CascadeConfig;
use fitfusion_cascade::grpc_server::CascadeGrpcServer;
use fitfusion_cascade::infra::db::DbStoreGateway;
use fitfusion_cascade::infra::grpc::GrpcIdentityGateway;
use fitfusion_cascade::jobs::expiry_sweep::start_expiry_sweep_worker;
use fitfusion_cascade::router::build_router;
use fitfusion_cascade::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CascadeConfig::from_env()?;
    init_tracing(config.log_format);

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    // Connects on first RPC; the identity bridge may start after us.
    let identity_channel = Channel::from_shared(config.identity_grpc_url.clone())
        .context("invalid IDENTITY_GRPC_URL")?
        .connect_lazy();

    let state = AppState {
        store: DbStoreGateway { db },
        identity: GrpcIdentityGateway::new(identity_channel),
        max_batch_ops: config.max_batch_ops,
    };

    // Spawn expiry sweep worker
    tokio::spawn(start_expiry_sweep_worker(
        state.sweeper(),
        config.sweep_worker(),
    ));

    // Spawn gRPC server
    let grpc_addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.cascade_grpc_port)
        .parse()
        .context("invalid gRPC address")?;
    let grpc_server = CascadeGrpcServer {
        state: state.clone(),
    };
    tokio::spawn(async move {
        info!("cascade gRPC server listening on {grpc_addr}");
        if let Err(e) = tonic::transport::Server::builder()
            .add_service(CascadeServiceServer::new(grpc_server))
            .serve(grpc_addr)
            .await
        {
            tracing::error!(error = %e, "gRPC server error");
        }
    });

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.cascade_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .context("failed to bind")?;

    info!("cascade service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
