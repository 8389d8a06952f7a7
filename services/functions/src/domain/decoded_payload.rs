/// リクエストボディのデコード
///
/// base64デコード → JSONパースの順に処理し、失敗した段階をエラー種別で区別する。
/// スキーマは強制しない（オブジェクト・配列・スカラー・nullをすべて受け入れる）。
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use thiserror::Error;

/// デコードエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// bodyフィールドが欠落またはnull
    #[error("request body is missing")]
    MissingBody,

    /// bodyが有効なbase64ではない
    #[error("request body is not valid base64: {0}")]
    InvalidBase64(String),

    /// デコード後のテキストが有効なJSONではない
    #[error("decoded body is not valid JSON: {0}")]
    InvalidJson(String),
}

impl DecodeError {
    /// エラーレスポンスの`error`フィールドに使う識別子
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MissingBody => "missing_body",
            DecodeError::InvalidBase64(_) => "invalid_base64",
            DecodeError::InvalidJson(_) => "invalid_json",
        }
    }
}

/// デコード済みのペイロード
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload(Value);

impl DecodedPayload {
    /// JSON値への参照を取得
    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// リクエストボディのデコーダー
pub struct PayloadDecoder;

impl PayloadDecoder {
    /// bodyをbase64デコードしてJSONとしてパースする
    ///
    /// # 例
    /// ```
    /// use functions::domain::PayloadDecoder;
    ///
    /// let payload = PayloadDecoder::decode(Some("eyJhIjoxfQ==")).unwrap();
    /// assert_eq!(payload.value()["a"], 1);
    /// ```
    pub fn decode(body: Option<&str>) -> Result<DecodedPayload, DecodeError> {
        let body = body.ok_or(DecodeError::MissingBody)?;

        let bytes = STANDARD
            .decode(body)
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;

        // 非UTF-8のバイト列もここでパースエラーになる
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

        Ok(DecodedPayload(value))
    }
}
