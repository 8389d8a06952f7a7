//! Lambda関数のデプロイ用アーティファクトを作成するビルドツール
//!
//! 関数ごとに以下を行う:
//! - `src/bin/<関数名>.rs` の存在確認
//! - cargoによるクロスコンパイル
//! - 実行ファイルを`bootstrap`として1エントリだけ含むzipの作成
//! - プロビジョニング用マニフェスト（コンテンツハッシュ、ルート）の出力

pub mod artifact;
pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod packager;

pub use artifact::{Artifact, ArtifactWriter, ENTRY_NAME, source_code_hash};
pub use compiler::{BinaryCompiler, CargoCompiler};
pub use config::PackagerConfig;
pub use error::BuildError;
pub use logging::init_logging;
pub use manifest::{ArtifactManifest, ManifestEntry, RouteEntry};
pub use packager::Packager;

use tracing::info;

/// マニフェストのファイル名
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// 設定に従って全関数をパッケージングし、マニフェストを書き出す
pub async fn run(config: &PackagerConfig) -> Result<ArtifactManifest, BuildError> {
    let compiler = CargoCompiler::from_config(config);
    let packager = Packager::new(
        compiler,
        ArtifactWriter::new(&config.output_dir),
        &config.crate_dir,
        config.jobs,
    );

    let artifacts = packager.build_all(&config.functions).await?;

    let manifest = ArtifactManifest::from_artifacts(&config.region, &config.runtime, &artifacts);
    let manifest_path = config.output_dir.join(MANIFEST_FILE_NAME);
    manifest.write(&manifest_path)?;

    info!(
        path = %manifest_path.display(),
        functions = artifacts.len(),
        "マニフェストを出力"
    );

    Ok(manifest)
}
