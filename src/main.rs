use ai_image_studio::{backend, cli, config, download, error, input, interactive, logging, progress, session};
use ai_image_common::ImageSlot;
use backend::HttpBackend;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{Result, StudioError};
use session::{Session, SubmitStatus};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Generate { prompt, image1, image2, face_swap, output_dir, no_download } => {
            let mut session = Session::new(connect(&config, cli.backend_url.as_deref())?);
            session.set_face_swap(face_swap);
            session.set_prompt(prompt);
            attach_image(&mut session, ImageSlot::Image1, image1.as_deref())?;
            attach_image(&mut session, ImageSlot::Image2, image2.as_deref())?;

            let dir = output_dir.unwrap_or_else(|| config.download_dir());
            submit_and_report(session, &dir, !no_download).await?;
        }

        Commands::Swap { image1, image2, output_dir, no_download } => {
            let mut session = Session::new(connect(&config, cli.backend_url.as_deref())?);
            session.set_face_swap(true);
            attach_image(&mut session, ImageSlot::Image1, Some(image1.as_path()))?;
            attach_image(&mut session, ImageSlot::Image2, Some(image2.as_path()))?;

            let dir = output_dir.unwrap_or_else(|| config.download_dir());
            submit_and_report(session, &dir, !no_download).await?;
        }

        Commands::Interactive { output_dir } => {
            let mut session = Session::new(connect(&config, cli.backend_url.as_deref())?);
            let progress = progress::spawn_progress(session.subscribe());
            let dir = output_dir.unwrap_or_else(|| config.download_dir());

            let result = interactive::run_interactive(&mut session, &dir).await;
            drop(session);
            progress.await.ok();
            result?;
        }

        Commands::Health => {
            let backend = connect(&config, cli.backend_url.as_deref())?;
            println!("🔌 {}", backend.base_url());
            let message = backend.health().await?;
            println!("✔ {}", if message.is_empty() { "OK" } else { message.as_str() });
        }

        Commands::Config { set_backend_url, set_download_dir, show } => {
            let mut config = config;

            if let Some(url) = set_backend_url {
                config.set_backend_url(&url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if let Some(dir) = set_download_dir {
                config.set_download_dir(dir)?;
                println!("✔ 保存先を設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンドURL: {}", config.backend_base_url);
                println!("  保存先: {}", config.download_dir().display());
                if let Ok(env) = std::env::var(config::BACKEND_URL_ENV) {
                    println!("  ({} = {} が優先されます)", config::BACKEND_URL_ENV, env);
                }
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn connect(config: &Config, backend_url: Option<&str>) -> Result<HttpBackend> {
    let base_url = config.resolve_backend_url(backend_url)?;
    log::debug!("バックエンド: {}", base_url);
    HttpBackend::new(base_url)
}

fn attach_image(session: &mut Session<HttpBackend>, slot: ImageSlot, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        let image = input::load_image(path)?;
        session.select_image(slot, Some(image));
    }
    Ok(())
}

/// 送信して結果を表示・保存
async fn submit_and_report(mut session: Session<HttpBackend>, dir: &Path, save: bool) -> Result<()> {
    println!("🚀 ai-image - {}\n", session.state().submit_label());
    let progress = progress::spawn_progress(session.subscribe());

    let status = session.submit().await?;
    let report = match status {
        SubmitStatus::Generated(handle) => {
            let (size, dimensions) = session
                .result()
                .map(|a| (a.bytes.len(), download::result_dimensions(&a.bytes)))
                .unwrap_or_default();
            let saved: Option<PathBuf> = if save { session.download(dir)? } else { None };
            Ok((handle, size, dimensions, saved))
        }
        SubmitStatus::Rejected(error) => Err(StudioError::Common(error.into())),
        SubmitStatus::Failed(message) => Err(StudioError::Generation(message)),
    };

    // 通知元を閉じてスピナーを片付けてから表示する
    drop(session);
    progress.await.ok();

    let (handle, size, dimensions, saved) = report?;
    match dimensions {
        Some((w, h)) => println!("✔ 生成完了: {} ({}x{}, {} bytes)", handle.uri(), w, h, size),
        None => println!("✔ 生成完了: {} ({} bytes)", handle.uri(), size),
    }
    if let Some(path) = saved {
        println!("✔ 保存しました: {}", path.display());
    }

    println!("\n✅ 完了");
    Ok(())
}
