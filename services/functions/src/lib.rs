use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use crate::application::RequestHandler;
use crate::domain::InboundEvent;
use crate::infrastructure::{HandlerConfig, TracingPayloadObserver, init_logging};

// Domain layer modules
pub mod domain;

// Application layer modules
pub mod application;

// Infrastructure layer modules
pub mod infrastructure;

/// 関数名を指定してLambdaランタイムを起動する
///
/// 各バイナリは関数名だけを渡し、処理本体は共通の`RequestHandler`を使う。
pub async fn run(function_name: &str) -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let config = HandlerConfig::for_function(function_name);
    info!(function = %config, route = %config.route_path(), "Lambda関数を初期化");

    let handler = RequestHandler::new(config, TracingPayloadObserver::new(function_name));
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<InboundEvent>| {
        handler.invoke(event)
    }))
    .await
}
