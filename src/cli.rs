use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "consent-forms")]
#[command(about = "撮影同意書のPDF生成・保存ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 保存先フォルダを選択
    Setup {
        /// 保存先フォルダ（省略時は対話入力）
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },

    /// 保存先フォルダの状態を表示
    Status,

    /// 同意書を検証して保存先へ保存
    Submit {
        /// フォーム入力JSONファイル
        #[arg(required = true)]
        form: PathBuf,
    },

    /// 同意書PDFを指定ファイルへ出力（保存先フォルダを使わない）
    Render {
        /// フォーム入力JSONファイル
        #[arg(required = true)]
        form: PathBuf,

        /// 出力PDFファイル
        #[arg(short, long, default_value = "consent.pdf")]
        output: PathBuf,
    },

    /// ページ割りと行を表示
    Preview {
        /// フォーム入力JSONファイル
        #[arg(required = true)]
        form: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// アセット取得元（ディレクトリまたはURL）を設定
        #[arg(long)]
        set_assets: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
