//! パッケージャー設定
//!
//! コマンドライン引数と環境変数から読み込む。

use std::path::PathBuf;

use clap::Parser;

/// パッケージャーの設定
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "packager")]
#[command(about = "Lambda関数をビルドしてデプロイ用zipを作成")]
pub struct PackagerConfig {
    /// パッケージングする関数名（`src/bin/<関数名>.rs`に対応）
    #[arg(default_values = ["function1", "function2"])]
    pub functions: Vec<String>,

    /// 関数クレートのディレクトリ
    #[arg(long, default_value = "services/functions", env = "PACKAGER_CRATE_DIR")]
    pub crate_dir: PathBuf,

    /// ビルドターゲット
    #[arg(long, default_value = "x86_64-unknown-linux-musl", env = "PACKAGER_TARGET")]
    pub target: String,

    /// cargoのビルドプロファイル
    #[arg(long, default_value = "release")]
    pub profile: String,

    /// cargoのターゲットディレクトリ
    #[arg(long, default_value = "target")]
    pub target_dir: PathBuf,

    /// zipとマニフェストの出力先
    #[arg(long, default_value = "target/lambda", env = "PACKAGER_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// デプロイ先リージョン（マニフェストに記録）
    #[arg(long, default_value = "ap-northeast-1", env = "AWS_REGION")]
    pub region: String,

    /// Lambdaランタイム識別子（マニフェストに記録）
    #[arg(long, default_value = "provided.al2023")]
    pub runtime: String,

    /// 同時にzip化する関数の最大数
    #[arg(long, short = 'j', default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// cargoコマンドのパス
    #[arg(long, default_value = "cargo")]
    pub cargo: PathBuf,

    /// ログをJSON形式で出力する
    #[arg(long)]
    pub log_json: bool,
}

impl PackagerConfig {
    /// ビルドプロファイルに対応する出力ディレクトリ名
    ///
    /// cargoは`dev`/`test`プロファイルの成果物を`debug`に置く。
    pub fn profile_dir(&self) -> &str {
        match self.profile.as_str() {
            "dev" | "test" => "debug",
            "bench" => "release",
            other => other,
        }
    }

    /// 関数のコンパイル済みバイナリのパス
    pub fn binary_path(&self, function: &str) -> PathBuf {
        self.target_dir
            .join(&self.target)
            .join(self.profile_dir())
            .join(function)
    }
}
