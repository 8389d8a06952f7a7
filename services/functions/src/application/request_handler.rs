/// リクエストハンドラー
///
/// function1 / function2 で共通の処理を、関数名（応答メッセージ）を設定として
/// 受け取る1つのハンドラーにまとめたもの。
use lambda_runtime::LambdaEvent;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{DecodeError, InboundEvent, OutboundResult, PayloadDecoder};
use crate::infrastructure::{HandlerConfig, PayloadObserver};

/// リクエストハンドラーのエラー型
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestHandlerError {
    /// bodyのデコードまたはパースに失敗
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DecodeError),
}

/// ゲートウェイからのイベントを処理するハンドラー
///
/// 保持するのは不変の設定とオブザーバーのみで、呼び出し間で状態を共有しない。
pub struct RequestHandler<O>
where
    O: PayloadObserver,
{
    /// 関数設定
    config: HandlerConfig,
    /// デコード済みペイロードの出力先
    observer: O,
}

impl<O> RequestHandler<O>
where
    O: PayloadObserver,
{
    /// 新しいRequestHandlerを作成
    pub fn new(config: HandlerConfig, observer: O) -> Self {
        Self { config, observer }
    }

    /// イベントを処理する
    ///
    /// # 処理フロー
    /// 1. bodyをbase64デコード
    /// 2. デコード結果をJSONとしてパース
    /// 3. ペイロードをオブザーバーに出力
    /// 4. 200 OKと固定メッセージを返却
    ///
    /// いずれかの段階で失敗した場合は以降の段階を実行せずに`Err`を返す。
    pub async fn handle(&self, event: &InboundEvent) -> Result<OutboundResult, RequestHandlerError> {
        let payload = PayloadDecoder::decode(event.body())?;

        self.observer.observe(&payload);

        Ok(OutboundResult::ok(self.config.message()))
    }

    /// イベントを処理し、失敗時は400レスポンスに変換する
    pub async fn respond(&self, event: &InboundEvent) -> OutboundResult {
        match self.handle(event).await {
            Ok(result) => result,
            Err(RequestHandlerError::InvalidRequest(err)) => {
                warn!(
                    function = %self.config,
                    error = %err,
                    "不正なリクエストボディ"
                );
                OutboundResult::bad_request(err.kind(), err.to_string())
            }
        }
    }

    /// Lambdaランタイムから呼び出されるエントリポイント
    pub async fn invoke(&self, event: LambdaEvent<InboundEvent>) -> Result<OutboundResult, lambda_runtime::Error> {
        debug!(
            function = %self.config,
            request_id = %event.context.request_id,
            "リクエスト受信"
        );

        let result = self.respond(&event.payload).await;

        debug!(
            function = %self.config,
            request_id = %event.context.request_id,
            status_code = result.status_code,
            "レスポンス返却"
        );

        Ok(result)
    }
}
