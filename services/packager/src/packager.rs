//! 関数のビルドとパッケージング
//!
//! コンパイルはcargoがターゲットディレクトリをロックするため1関数ずつ行い、
//! zip化は関数ごとに別ファイルへ書き込むので並列に行う。

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::artifact::{Artifact, ArtifactWriter};
use crate::compiler::BinaryCompiler;
use crate::error::BuildError;

/// 関数のビルドとzip化を行うパッケージャー
pub struct Packager<C>
where
    C: BinaryCompiler,
{
    /// バイナリのコンパイラー
    compiler: C,
    /// zipの書き込み先
    writer: ArtifactWriter,
    /// 関数クレートのディレクトリ
    crate_dir: PathBuf,
    /// zip化の最大並列数
    jobs: usize,
}

impl<C> Packager<C>
where
    C: BinaryCompiler,
{
    /// 新しいPackagerを作成
    pub fn new(compiler: C, writer: ArtifactWriter, crate_dir: impl AsRef<Path>, jobs: u16) -> Self {
        Self {
            compiler,
            writer,
            crate_dir: crate_dir.as_ref().to_path_buf(),
            jobs: usize::from(jobs.max(1)),
        }
    }

    /// 関数のソースファイルのパス
    pub fn source_path(&self, function: &str) -> PathBuf {
        self.crate_dir
            .join("src")
            .join("bin")
            .join(format!("{}.rs", function))
    }

    /// 1関数をビルドしてzipを作成する
    ///
    /// # 処理フロー
    /// 1. 関数名を検証
    /// 2. ソースファイルの存在を確認
    /// 3. コンパイル
    /// 4. zipを作成して内容を検証
    pub async fn build(&self, function: &str) -> Result<Artifact, BuildError> {
        let binary = self.compile(function).await?;
        package(self.writer.clone(), function.to_string(), binary).await
    }

    /// 複数の関数をビルドしてzipを作成する
    ///
    /// 戻り値は引数と同じ順序。いずれかが失敗した場合は最初のエラーを返す。
    pub async fn build_all(&self, functions: &[String]) -> Result<Vec<Artifact>, BuildError> {
        let mut seen = HashSet::new();
        for function in functions {
            validate_function_name(function)?;
            if !seen.insert(function.as_str()) {
                return Err(BuildError::DuplicateFunction(function.clone()));
            }
        }

        // どれか1つでもソースがなければ何もコンパイルしない
        for function in functions {
            self.ensure_source(function).await?;
        }

        // コンパイルは順番に
        let mut binaries = Vec::with_capacity(functions.len());
        for function in functions {
            binaries.push((function.clone(), self.compile(function).await?));
        }

        // zip化は並列に
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut tasks = JoinSet::new();
        for (index, (function, binary)) in binaries.into_iter().enumerate() {
            let writer = self.writer.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| BuildError::Task(e.to_string()))?;
                let artifact = package(writer, function, binary).await?;
                Ok::<_, BuildError>((index, artifact))
            });
        }

        let mut artifacts: Vec<Option<Artifact>> = vec![None; functions.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, artifact) = joined.map_err(|e| BuildError::Task(e.to_string()))??;
            artifacts[index] = Some(artifact);
        }

        Ok(artifacts.into_iter().flatten().collect())
    }

    async fn compile(&self, function: &str) -> Result<PathBuf, BuildError> {
        validate_function_name(function)?;
        self.ensure_source(function).await?;

        info!(function = function, "コンパイル開始");
        self.compiler.compile(function).await
    }

    async fn ensure_source(&self, function: &str) -> Result<(), BuildError> {
        let source = self.source_path(function);
        if !tokio::fs::try_exists(&source).await? {
            error!(function = function, path = %source.display(), "ソースファイルが見つからない");
            return Err(BuildError::MissingSource {
                function: function.to_string(),
                path: source,
            });
        }
        Ok(())
    }
}

/// バイナリをzip化する（ブロッキングI/Oは専用スレッドで実行）
async fn package(writer: ArtifactWriter, function: String, binary: PathBuf) -> Result<Artifact, BuildError> {
    tokio::task::spawn_blocking(move || writer.write(&function, &binary))
    .await
    .map_err(|e| BuildError::Task(e.to_string()))?
}

/// 関数名は`[A-Za-z0-9_-]+`のみ許可する
///
/// 関数名はそのままファイル名とルートパスに使われる。
pub fn validate_function_name(function: &str) -> Result<(), BuildError> {
    let valid = !function.is_empty()
        && function
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidFunctionName(function.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::verify_artifact;
    use crate::compiler::tests::MockCompiler;
    use std::fs;

    // ==================== テストヘルパー ====================

    /// `src/bin/<関数名>.rs`を持つ関数クレートを一時ディレクトリに作成
    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(functions: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let bin_dir = dir.path().join("functions").join("src").join("bin");
            fs::create_dir_all(&bin_dir).unwrap();
            for function in functions {
                fs::write(bin_dir.join(format!("{}.rs", function)), "fn main() {}").unwrap();
            }
            Self { dir }
        }

        fn crate_dir(&self) -> PathBuf {
            self.dir.path().join("functions")
        }

        fn output_dir(&self) -> PathBuf {
            self.dir.path().join("lambda")
        }

        fn packager(&self) -> (Packager<MockCompiler>, MockCompiler) {
            let compiler = MockCompiler::new(&self.dir.path().join("target"));
            let packager = Packager::new(
                compiler.clone(),
                ArtifactWriter::new(self.output_dir()),
                self.crate_dir(),
                2,
            );
            (packager, compiler)
        }
    }

    fn names(functions: &[&str]) -> Vec<String> {
        functions.iter().map(|f| f.to_string()).collect()
    }

    // ==================== build ====================

    #[tokio::test]
    async fn test_build_single_function() {
        let fixture = Fixture::new(&["function1"]);
        let (packager, compiler) = fixture.packager();
        compiler.set_binary("function1", b"function1 binary");

        let artifact = packager.build("function1").await.unwrap();

        assert_eq!(artifact.path, fixture.output_dir().join("function1.zip"));
        assert_eq!(verify_artifact(&artifact.path).unwrap(), b"function1 binary");
        assert_eq!(compiler.compiled(), vec!["function1"]);
    }

    #[tokio::test]
    async fn test_build_missing_source() {
        let fixture = Fixture::new(&["function1"]);
        let (packager, compiler) = fixture.packager();

        let result = packager.build("function3").await;

        match result {
            Err(BuildError::MissingSource { function, path }) => {
                assert_eq!(function, "function3");
                assert!(path.ends_with("src/bin/function3.rs"));
            }
            other => panic!("Expected MissingSource, got {:?}", other),
        }
        // コンパイルもzip作成も行われない
        assert!(compiler.compiled().is_empty());
        assert!(!fixture.output_dir().join("function3.zip").exists());
    }

    #[tokio::test]
    async fn test_build_compile_failure_leaves_no_artifact() {
        let fixture = Fixture::new(&["function1"]);
        let (packager, compiler) = fixture.packager();
        compiler.set_failure("function1", "error[E0308]: mismatched types");

        let result = packager.build("function1").await;

        assert!(matches!(result, Err(BuildError::CompileFailed { .. })));
        assert!(!fixture.output_dir().join("function1.zip").exists());
    }

    #[tokio::test]
    async fn test_build_rejects_path_like_names() {
        let fixture = Fixture::new(&[]);
        let (packager, compiler) = fixture.packager();

        for name in ["", "../function1", "a/b", "func tion", "関数"] {
            let result = packager.build(name).await;
            assert!(
                matches!(result, Err(BuildError::InvalidFunctionName(_))),
                "name: {:?}",
                name
            );
        }
        assert!(compiler.compiled().is_empty());
    }

    /// 同じソースを2回ビルドしても同じアーティファクトになる
    #[tokio::test]
    async fn test_build_is_idempotent() {
        let fixture = Fixture::new(&["function2"]);
        let (packager, _) = fixture.packager();

        let first = packager.build("function2").await.unwrap();
        let second = packager.build("function2").await.unwrap();

        assert_eq!(first, second);
    }

    // ==================== build_all ====================

    #[tokio::test]
    async fn test_build_all_preserves_order() {
        let fixture = Fixture::new(&["function1", "function2", "function3"]);
        let (packager, compiler) = fixture.packager();

        let artifacts = packager
            .build_all(&names(&["function3", "function1", "function2"]))
            .await
            .unwrap();

        let built: Vec<&str> = artifacts.iter().map(|a| a.function_name.as_str()).collect();
        assert_eq!(built, vec!["function3", "function1", "function2"]);
        assert_eq!(compiler.compiled(), vec!["function3", "function1", "function2"]);
        for artifact in &artifacts {
            assert_eq!(
                artifact.path,
                fixture.output_dir().join(format!("{}.zip", artifact.function_name))
            );
        }
    }

    #[tokio::test]
    async fn test_build_all_distinct_hashes_per_function() {
        let fixture = Fixture::new(&["function1", "function2"]);
        let (packager, compiler) = fixture.packager();
        compiler.set_binary("function1", b"one");
        compiler.set_binary("function2", b"two");

        let artifacts = packager.build_all(&names(&["function1", "function2"])).await.unwrap();

        assert_ne!(artifacts[0].source_code_hash, artifacts[1].source_code_hash);
    }

    #[tokio::test]
    async fn test_build_all_rejects_duplicates() {
        let fixture = Fixture::new(&["function1"]);
        let (packager, compiler) = fixture.packager();

        let result = packager.build_all(&names(&["function1", "function1"])).await;

        assert!(matches!(result, Err(BuildError::DuplicateFunction(name)) if name == "function1"));
        assert!(compiler.compiled().is_empty());
    }

    /// 途中の関数でコンパイルに失敗した場合、zipは1つも作られない
    #[tokio::test]
    async fn test_build_all_stops_on_compile_failure() {
        let fixture = Fixture::new(&["function1", "function2"]);
        let (packager, compiler) = fixture.packager();
        compiler.set_failure("function2", "linker error");

        let result = packager.build_all(&names(&["function1", "function2"])).await;

        assert!(matches!(result, Err(BuildError::CompileFailed { function, .. }) if function == "function2"));
        assert!(!fixture.output_dir().join("function1.zip").exists());
        assert!(!fixture.output_dir().join("function2.zip").exists());
    }

    #[tokio::test]
    async fn test_build_all_checks_every_source_before_compiling() {
        let fixture = Fixture::new(&["function1"]);
        let (packager, compiler) = fixture.packager();

        let result = packager.build_all(&names(&["function1", "function9"])).await;

        assert!(matches!(result, Err(BuildError::MissingSource { function, .. }) if function == "function9"));
        assert!(compiler.compiled().is_empty());
    }

    #[tokio::test]
    async fn test_build_all_empty() {
        let fixture = Fixture::new(&[]);
        let (packager, _) = fixture.packager();

        let artifacts = packager.build_all(&[]).await.unwrap();

        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_validate_function_name() {
        assert!(validate_function_name("function1").is_ok());
        assert!(validate_function_name("my_function-2").is_ok());
        assert!(validate_function_name("").is_err());
        assert!(validate_function_name("x.zip").is_err());
    }
}
