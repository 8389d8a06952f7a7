//! ビルドエラー
//!
//! どのエラーでも、失敗した関数のアーティファクトは出力先に残らない。

use std::path::PathBuf;

use thiserror::Error;

/// パッケージング処理のエラー型
#[derive(Debug, Error)]
pub enum BuildError {
    /// 関数名にパスやアーカイブ名として使えない文字が含まれる
    #[error("invalid function name: {0:?}")]
    InvalidFunctionName(String),

    /// 同じ関数が1回のビルドで複数回指定された
    #[error("function specified more than once: {0}")]
    DuplicateFunction(String),

    /// 関数のソースファイルが存在しない
    #[error("source for {function} not found: {}", path.display())]
    MissingSource { function: String, path: PathBuf },

    /// コンパイルに失敗
    #[error("failed to compile {function} (exit code {status:?}): {stderr}")]
    CompileFailed {
        function: String,
        status: Option<i32>,
        stderr: String,
    },

    /// コンパイルは成功したが実行ファイルが見つからない
    #[error("compiled binary for {function} not found: {}", path.display())]
    MissingBinary { function: String, path: PathBuf },

    /// アーカイブの内容が期待と異なる
    #[error("invalid artifact {}: {reason}", path.display())]
    InvalidArtifact { path: PathBuf, reason: String },

    /// ファイルI/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// zip作成エラー
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// マニフェストのシリアライズエラー
    #[error("manifest serialization error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// パッケージングタスクのパニック・キャンセル
    #[error("packaging task failed: {0}")]
    Task(String),
}

impl BuildError {
    /// エラーの対象となった関数名（特定できる場合）
    pub fn function(&self) -> Option<&str> {
        match self {
            BuildError::InvalidFunctionName(function)
            | BuildError::DuplicateFunction(function)
            | BuildError::MissingSource { function, .. }
            | BuildError::CompileFailed { function, .. }
            | BuildError::MissingBinary { function, .. } => Some(function),
            _ => None,
        }
    }
}
