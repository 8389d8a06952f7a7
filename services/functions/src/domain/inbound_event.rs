/// API Gatewayから渡されるインバウンドイベント
///
/// ハンドラーが参照するのは`body`のみ。ヘッダー、パス、HTTPメソッドなどの
/// トランスポート情報は受け入れるが使用しない。
use serde::Deserialize;
use serde_json::{Map, Value};

/// Lambdaプロキシ統合のイベント
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// base64エンコードされたリクエストボディ（欠落・null可）
    #[serde(default)]
    pub body: Option<String>,

    /// ゲートウェイがbodyをbase64化したかどうか（参照しない）
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,

    /// その他のトランスポートフィールド（headers, path, httpMethod等）
    #[serde(flatten)]
    pub transport: Map<String, Value>,
}

impl InboundEvent {
    /// bodyだけを持つイベントを作成
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// bodyを文字列スライスとして取得
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
