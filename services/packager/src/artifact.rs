//! デプロイ用zipアーティファクト
//!
//! 1関数につき`<出力先>/<関数名>.zip`を1つ作成する。zipには実行ファイルを
//! `bootstrap`という名前で1エントリだけ格納する（`provided.al2023`ランタイムが
//! 読み込むエントリポイント）。
//!
//! タイムスタンプと権限を固定しているため、同じバイナリからは常に同じバイト列の
//! zipができる。したがってコンテンツハッシュはバイナリが変わったときだけ変わる。

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::BuildError;

/// zip内のエントリ名
pub const ENTRY_NAME: &str = "bootstrap";

/// エントリのUNIXパーミッション
const ENTRY_MODE: u32 = 0o755;

/// 作成済みアーティファクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// 関数名
    pub function_name: String,
    /// zipファイルのパス
    pub path: PathBuf,
    /// base64(SHA-256(zip))
    pub source_code_hash: String,
    /// zipのサイズ（バイト）
    pub size: u64,
}

impl Artifact {
    /// zipのファイル名（例: "function1.zip"）
    pub fn file_name(&self) -> String {
        archive_file_name(&self.function_name)
    }
}

/// 関数名からzipファイル名を作る
pub fn archive_file_name(function: &str) -> String {
    format!("{}.zip", function)
}

/// zipのバイト列からコンテンツハッシュを計算する
///
/// Terraformの`source_code_hash`と同じ形式（base64エンコードしたSHA-256）。
pub fn source_code_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    STANDARD.encode(hasher.finalize())
}

/// zipアーティファクトを出力先ディレクトリに書き出す
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// 新しいArtifactWriterを作成
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 関数のzipの出力パス
    pub fn artifact_path(&self, function: &str) -> PathBuf {
        self.output_dir.join(archive_file_name(function))
    }

    /// 書き込み途中のzipの一時パス
    fn temp_path(&self, function: &str) -> PathBuf {
        self.output_dir.join(format!(".{}.zip.tmp", function))
    }

    /// バイナリをzip化して書き出す
    ///
    /// 一時ファイルに書き込み、内容を検証してから同じディレクトリ内でrenameするため、
    /// 途中で失敗しても壊れたzipが出力パスに残ることはない。
    pub fn write(&self, function: &str, binary_path: &Path) -> Result<Artifact, BuildError> {
        let binary = fs::read(binary_path)?;
        let archive = build_archive(&binary)?;
        self.persist(function, &archive)
    }

    /// zipのバイト列を出力パスに配置する
    fn persist(&self, function: &str, archive: &[u8]) -> Result<Artifact, BuildError> {
        let source_code_hash = source_code_hash(archive);

        fs::create_dir_all(&self.output_dir)?;
        let temp_path = self.temp_path(function);
        let path = self.artifact_path(function);

        if let Err(err) = write_verify_rename(&temp_path, &path, archive) {
            remove_temp_file(&temp_path);
            return Err(err);
        }

        info!(
            function = function,
            path = %path.display(),
            size = archive.len(),
            source_code_hash = %source_code_hash,
            "アーティファクトを作成"
        );

        Ok(Artifact {
            function_name: function.to_string(),
            path,
            source_code_hash,
            size: archive.len() as u64,
        })
    }
}

/// バイナリを1エントリだけ含むzipをメモリ上に作成する
fn build_archive(binary: &[u8]) -> Result<Vec<u8>, BuildError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(ENTRY_MODE)
        .last_modified_time(DateTime::default());

    zip.start_file(ENTRY_NAME, options)?;
    zip.write_all(binary)?;

    Ok(zip.finish()?.into_inner())
}

fn write_verify_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    verify_artifact(temp_path)?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// 失敗時に残った一時ファイルを削除する
pub(crate) fn remove_temp_file(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "一時ファイルの削除に失敗");
        }
    }
}

/// zipを開いて、`bootstrap`エントリ1つだけを含むことを検証する
///
/// # 戻り値
/// * 成功時は`bootstrap`エントリの中身
pub fn verify_artifact(path: &Path) -> Result<Vec<u8>, BuildError> {
    let invalid = |reason: String| BuildError::InvalidArtifact {
        path: path.to_path_buf(),
        reason,
    };

    let mut archive = ZipArchive::new(fs::File::open(path)?)?;
    if archive.len() != 1 {
        return Err(invalid(format!("expected 1 entry, found {}", archive.len())));
    }

    let mut entry = archive.by_index(0)?;
    if entry.name() != ENTRY_NAME {
        return Err(invalid(format!("unexpected entry name {:?}", entry.name())));
    }
    if entry.unix_mode().map(|mode| mode & 0o111) != Some(0o111) {
        return Err(invalid("entry is not executable".to_string()));
    }

    let mut contents = Vec::new();
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}
