/// ハンドラー設定
///
/// 関数名はゲートウェイのルートパス、アーティファクト名、応答メッセージで
/// 同じ文字列をそのまま使う。
use std::fmt;

/// 関数ごとの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// 関数名（例: "function1"）
    function_name: String,
    /// 成功時に返すメッセージ
    message: String,
}

impl HandlerConfig {
    /// 関数名から設定を作成する
    ///
    /// メッセージは`"This is <関数名>"`になる。
    pub fn for_function(function_name: impl Into<String>) -> Self {
        let function_name = function_name.into();
        let message = format!("This is {}", function_name);
        Self {
            function_name,
            message,
        }
    }

    /// 応答メッセージを取得
    pub fn message(&self) -> &str {
        &self.message
    }

    /// ゲートウェイ上のルートパスを取得
    pub fn route_path(&self) -> String {
        format!("/{}", self.function_name)
    }
}

impl fmt::Display for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function_name)
    }
}
