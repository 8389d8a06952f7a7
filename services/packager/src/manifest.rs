//! プロビジョニング用マニフェスト
//!
//! Terraform等のプロビジョニングツールが読み込む、関数ごとのアーティファクト、
//! コンテンツハッシュ、ゲートウェイのルートをまとめたJSON。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ENTRY_NAME, remove_temp_file};
use crate::error::BuildError;

/// ゲートウェイのルートが受け付けるHTTPメソッド
const ROUTE_METHOD: &str = "POST";

/// ゲートウェイのルート定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// ルートパス（関数名をそのまま使う）
    pub path: String,
    /// HTTPメソッド
    pub method: String,
}

/// 関数1つ分のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub function_name: String,
    /// 出力先ディレクトリからの相対パス
    pub artifact: String,
    /// zip内のエントリポイント
    pub handler: String,
    pub source_code_hash: String,
    pub size: u64,
    pub route: RouteEntry,
}

/// マニフェスト全体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub region: String,
    pub runtime: String,
    pub functions: Vec<ManifestEntry>,
}

impl ArtifactManifest {
    /// アーティファクト一覧からマニフェストを作成
    pub fn from_artifacts(region: &str, runtime: &str, artifacts: &[Artifact]) -> Self {
        let functions = artifacts
            .iter()
            .map(|artifact| ManifestEntry {
                function_name: artifact.function_name.clone(),
                artifact: artifact.file_name(),
                handler: ENTRY_NAME.to_string(),
                source_code_hash: artifact.source_code_hash.clone(),
                size: artifact.size,
                route: RouteEntry {
                    path: format!("/{}", artifact.function_name),
                    method: ROUTE_METHOD.to_string(),
                },
            })
            .collect();

        Self {
            region: region.to_string(),
            runtime: runtime.to_string(),
            functions,
        }
    }

    /// マニフェストをJSONで書き出す（一時ファイル経由）
    pub fn write(&self, path: &Path) -> Result<(), BuildError> {
        let json = serde_json::to_vec_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&temp_path, json).and_then(|()| fs::rename(&temp_path, path)) {
            remove_temp_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    /// マニフェストを読み込む
    pub fn read(path: &Path) -> Result<Self, BuildError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
