use tracing_subscriber::EnvFilter;

/// 初始化全局 tracing subscriber，输出到 stderr
///
/// `RUST_LOG` 存在时优先，否则使用配置中的过滤规则。重复初始化时静默忽略。
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
