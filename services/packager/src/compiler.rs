//! 関数バイナリのコンパイル
//!
//! 実際のcargo呼び出しはテストで差し替えられるようトレイトで抽象化する。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::PackagerConfig;
use crate::error::BuildError;

/// stderrをエラーに含める際の最大文字数
const STDERR_TAIL_CHARS: usize = 4000;

/// 関数をコンパイルして実行ファイルのパスを返す
#[async_trait]
pub trait BinaryCompiler: Send + Sync {
    /// 関数をコンパイル
    ///
    /// # 戻り値
    /// * 成功時はコンパイル済み実行ファイルのパス
    /// * 失敗時は`BuildError::CompileFailed`または`BuildError::MissingBinary`
    async fn compile(&self, function: &str) -> Result<PathBuf, BuildError>;
}

/// cargoでクロスコンパイルするコンパイラー
#[derive(Debug, Clone)]
pub struct CargoCompiler {
    config: PackagerConfig,
}

impl CargoCompiler {
    /// 設定からCargoCompilerを作成
    pub fn from_config(config: &PackagerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// cargoに渡す引数
    pub fn command_args(&self, function: &str) -> Vec<String> {
        vec![
            "build".to_string(),
            "--manifest-path".to_string(),
            self.config.crate_dir.join("Cargo.toml").display().to_string(),
            "--bin".to_string(),
            function.to_string(),
            "--target".to_string(),
            self.config.target.clone(),
            "--profile".to_string(),
            self.config.profile.clone(),
            "--target-dir".to_string(),
            self.config.target_dir.display().to_string(),
        ]
    }
}

#[async_trait]
impl BinaryCompiler for CargoCompiler {
    async fn compile(&self, function: &str) -> Result<PathBuf, BuildError> {
        let args = self.command_args(function);
        debug!(function = function, cargo = %self.config.cargo.display(), args = ?args, "cargo起動");

        let output = Command::new(&self.config.cargo)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::CompileFailed {
                function: function.to_string(),
                status: output.status.code(),
                stderr: tail(&stderr, STDERR_TAIL_CHARS),
            });
        }

        let binary = self.config.binary_path(function);
        if !tokio::fs::try_exists(&binary).await? {
            return Err(BuildError::MissingBinary {
                function: function.to_string(),
                path: binary,
            });
        }

        info!(function = function, binary = %binary.display(), "コンパイル完了");
        Ok(binary)
    }
}

/// 文字列の末尾`max_chars`文字を取り出す
fn tail(text: &str, max_chars: usize) -> String {
    let text = text.trim_end();
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}
