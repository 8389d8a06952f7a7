/// ゲートウェイへ返却するレスポンス
///
/// `{ "statusCode": number, "body": string }`の固定形状。ヘッダーは設定しない。
use serde::{Deserialize, Serialize};

/// 成功時のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerMessage {
    /// どのハンドラーが応答したかを示す文字列
    pub message: String,
}

/// 失敗時のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// エラー種別（"missing_body", "invalid_base64", "invalid_json"）
    pub error: String,
    /// 詳細なエラーメッセージ
    pub message: String,
}

/// Lambdaプロキシ統合のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResult {
    /// HTTPステータスコード
    pub status_code: u16,
    /// シリアライズ済みJSONボディ
    pub body: String,
}

impl OutboundResult {
    /// 200 OKと固定メッセージのレスポンスを作成
    pub fn ok(message: &str) -> Self {
        Self::json(
            200,
            &HandlerMessage {
                message: message.to_string(),
            },
        )
    }

    /// 400 Bad Requestのレスポンスを作成
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        Self::json(
            400,
            &ErrorBody {
                error: error.to_string(),
                message: message.into(),
            },
        )
    }

    fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        // 文字列フィールドのみの構造体はシリアライズに失敗しない
        let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
        Self { status_code, body }
    }
}
