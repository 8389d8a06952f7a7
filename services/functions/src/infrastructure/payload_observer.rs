/// ペイロード観測（observability sink）
///
/// デコード済みペイロードをハンドラーの外に出力する副作用を抽象化する。
/// 本番ではtracing経由でCloudWatch Logsに出力し、テストではモックに差し替える。
use crate::domain::DecodedPayload;

/// デコード済みペイロードの出力先
pub trait PayloadObserver: Send + Sync {
    /// ペイロードを1回出力する（マスキングなし）
    fn observe(&self, payload: &DecodedPayload);
}

/// tracingにペイロードを出力するオブザーバー
#[derive(Debug, Clone)]
pub struct TracingPayloadObserver {
    /// ログに付与する関数名
    function_name: String,
}

impl TracingPayloadObserver {
    /// 新しいTracingPayloadObserverを作成
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }
}

impl PayloadObserver for TracingPayloadObserver {
    fn observe(&self, payload: &DecodedPayload) {
        tracing::info!(
            function = %self.function_name,
            payload = %payload.value(),
            "デコード済みペイロード"
        );
    }
}
