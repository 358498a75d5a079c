use anyhow::Context;
use clap::Parser;
use consent_forms::{cli, config, consent, export, folder};
use consent_forms::clock::SystemClock;
use cli::{Cli, Commands};
use config::Config;
use consent_forms_common::ConsentForm;
use export::{ConsentPdfGenerator, DrawOp, PrintPdfProvider, RecordingCanvas, RecordingProvider};
use folder::{FixedPicker, FolderManager, HandleStore, LocalDirectoryAccess, PromptPicker};
use std::path::Path;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn read_form(path: &Path) -> anyhow::Result<ConsentForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("フォームを読み込めません: {}", path.display()))?;
    consent::parse_form(&content)
        .with_context(|| format!("フォームJSONが不正です: {}", path.display()))
}

fn folder_manager(config: &Config) -> anyhow::Result<FolderManager<LocalDirectoryAccess>> {
    let store_path = config.store_path()?;
    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("ストアの保存先を作成できません: {}", parent.display()))?;
    }
    Ok(FolderManager::new(
        HandleStore::open(store_path),
        LocalDirectoryAccess::new(config.interactive_permissions),
        SystemClock,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Setup { folder } => {
            println!("📁 consent-forms - 保存先の設定\n");

            let mut folders = folder_manager(&config)?;
            let outcome = match folder {
                Some(path) => folders.pick_new(&FixedPicker::new(path)).await?,
                None => folders.pick_new(&PromptPicker).await?,
            };
            println!("{}", outcome.status);
            if let Some(handle) = &outcome.handle {
                println!("  パス: {}", handle.path().display());
            }
            if !outcome.is_ready() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let mut folders = folder_manager(&config)?;
            let outcome = folders.initialize().await?;
            println!("{}", outcome.status);
            if let Some(date_folder) = &outcome.date_folder {
                println!("  パス: {}", date_folder.path().display());
            }
        }

        Commands::Submit { form } => {
            println!("📝 consent-forms - 同意書の保存\n");

            let form = read_form(&form)?;
            let generator =
                ConsentPdfGenerator::new(PrintPdfProvider, config.assets()?, config.merge_policy());
            let mut workflow = consent::ConsentWorkflow::new(generator, folder_manager(&config)?);

            let outcome = workflow.submit(form).await?;
            let status = outcome.status();
            if let consent::SubmitOutcome::FolderUnavailable(folder_outcome) = &outcome {
                eprintln!("{}", folder_outcome.status);
                eprintln!("  `consent-forms setup` で保存先を選択してください");
            }
            if status.is_error() {
                eprintln!("{}", status);
                std::process::exit(1);
            }
            println!("{}", status);
            if let consent::SubmitOutcome::Saved { path, .. } = &outcome {
                println!("  パス: {}", path.display());
            }
        }

        Commands::Render { form, output } => {
            println!("📄 consent-forms - PDF出力\n");

            let form = read_form(&form)?;
            form.validate()?;
            let generator =
                ConsentPdfGenerator::new(PrintPdfProvider, config.assets()?, config.merge_policy());
            let document = generator.generate(&form).await?;
            std::fs::write(&output, &document.bytes)
                .with_context(|| format!("PDFを書き込めません: {}", output.display()))?;

            println!("✔ {}ページ", document.page_count);
            if !document.logo_embedded {
                println!("- ロゴなしで出力しました");
            }
            println!("✔ PDFを保存: {}", output.display());
        }

        Commands::Preview { form } => {
            let form = read_form(&form)?;
            let generator =
                ConsentPdfGenerator::new(RecordingProvider, config.assets()?, config.merge_policy());
            let document = generator.generate(&form).await?;

            for op in RecordingCanvas::parse(&document.bytes)? {
                match op {
                    DrawOp::Page { page } => println!("--- page {} ---", page),
                    DrawOp::Text { y, bold, text, .. } => {
                        println!("{:>7.2} {} {}", y, if bold { "*" } else { " " }, text)
                    }
                    DrawOp::Image { y, width, height, .. } => {
                        println!("{:>7.2}   [logo {:.0}x{:.0}pt]", y, width, height)
                    }
                }
            }
        }

        Commands::Config { set_assets, show } => {
            let mut config = config;

            if let Some(base) = set_assets {
                config.set_asset_base(base)?;
                println!("✔ アセット取得元を設定しました");
            }

            if show {
                println!("設定:");
                println!("  アセット取得元: {}", config.asset_base);
                println!("  プロフィール: {}", config.profile_path);
                println!("  ロゴ: {}", config.logo_path);
                println!("  ハンドルストア: {}", config.store_path()?.display());
                println!(
                    "  SNSアカウントからWeb使用を推定: {}",
                    if config.infer_web_use_from_handles { "有効" } else { "無効" }
                );
            }
        }
    }

    Ok(())
}
