/// ログ基盤モジュール
///
/// Lambda環境向けの構造化ログ設定を提供する。
/// CloudWatch Logsで検索しやすいよう、1イベント1行のJSONで出力する。
use std::sync::Once;

use tracing_subscriber::fmt::{
    self, MakeWriter,
    format::{Format, Json, JsonFields},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 環境変数`RUST_LOG`でログレベルを指定できる（デフォルトはinfo）。
/// 複数回呼び出しても最初の1回のみ初期化する。
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // テストなどで既にグローバルサブスクライバーがある場合は何もしない
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// JSON形式のログレイヤー（Lambda/CloudWatch向け）
///
/// イベントのフィールドはトップレベルに展開し、スパン情報は含めない。
fn json_layer<S, W>(make_writer: W) -> fmt::Layer<S, JsonFields, Format<Json>, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(make_writer)
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
