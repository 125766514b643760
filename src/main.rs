use anyhow::Context;
use bookshop_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshop settings")?;
    bookshop_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        path = %settings.database.path.display(),
        "bookshop-app starting"
    );

    let store = bookshop_db::open(&settings.database).context("failed to open record store")?;

    let mut registry = ModuleRegistry::new();
    bookshop_app::modules::register_all(&mut registry, store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshop_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
