//! ログ基盤モジュール
//!
//! ローカル/CIで実行するため、デフォルトは人間が読みやすい形式でstderrに出力する。
//! `--log-json`指定時はCIのログ収集向けにJSON形式で出力する。

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ログサブスクライバーを初期化する
///
/// 環境変数`RUST_LOG`でログレベルを指定できる（デフォルトはinfo）。
pub fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 既に初期化済みの場合は何もしない
    let _ = build_subscriber(json, env_filter, std::io::stderr).try_init();
}

/// 出力形式に応じたサブスクライバーを組み立てる
fn build_subscriber<W>(json: bool, env_filter: EnvFilter, make_writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(make_writer)
                    .with_target(true)
                    .flatten_event(true),
            ),
        )
    } else {
        Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_writer(make_writer)
                    .with_target(false)
                    .compact(),
            ),
        )
    }
}
