// アプリケーション層モジュール
pub mod request_handler;

// 再エクスポート
pub use request_handler::{RequestHandler, RequestHandlerError};
