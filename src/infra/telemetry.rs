use tracing_subscriber::EnvFilter;

/// Подключить fmt-подписчика tracing. Фильтр из `RUST_LOG`, по умолчанию `info`.
///
/// Повторный вызов ничего не делает (подписчик уже установлен).
pub fn init_tracing(service: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(service, "логирование включено");
    }
}
