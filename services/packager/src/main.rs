//! Lambda関数のパッケージングCLI
//!
//! # 使用例
//! ```bash
//! # function1, function2 をビルドして target/lambda/*.zip を作成
//! cargo run -p packager
//!
//! # 特定の関数だけ、ARM64向けに
//! cargo run -p packager -- function2 --target aarch64-unknown-linux-musl
//! ```

use std::process::ExitCode;

use clap::Parser;
use packager::{PackagerConfig, init_logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = PackagerConfig::parse();
    init_logging(config.log_json);

    info!(
        functions = ?config.functions,
        target = %config.target,
        output_dir = %config.output_dir.display(),
        "パッケージング開始"
    );

    match packager::run(&config).await {
        Ok(manifest) => {
            for entry in &manifest.functions {
                info!(
                    function = %entry.function_name,
                    artifact = %entry.artifact,
                    source_code_hash = %entry.source_code_hash,
                    "パッケージング完了"
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(function = ?err.function(), error = %err, "パッケージング失敗");
            ExitCode::FAILURE
        }
    }
}
