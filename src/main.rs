use anyhow::{Context, Result, anyhow};
use chrono::Local;
use crewboard::core::cli::CliOptions;
use crewboard::core::context::{BoardContext, NoticeLevel};
use crewboard::core::persist::load_board;
use crewboard::logging::LogTarget;
use crewboard::ui::chrome::UiChrome;
use crewboard::ui::display_manager::DisplayManager;
use std::io::{self, Write};

fn run() -> Result<()> {
    let opts = CliOptions::from_env().map_err(|e| anyhow!(e))?;

    let mut ctx = BoardContext::new_with_paths(
        opts.config_path.clone(),
        opts.board_path.clone(),
        opts.logs_dir.clone(),
    )
    .with_context(|| format!("Cannot start with config {}", opts.config_path.display()))?;

    if opts.board_path.exists() {
        load_board(&mut ctx, &opts.board_path)
            .with_context(|| format!("Cannot load board {}", opts.board_path.display()))?;
        ctx.logger.info(
            format!(
                "Loaded {} appointments from {}",
                ctx.appointments.len(),
                opts.board_path.display()
            ),
            LogTarget::FileOnly,
        );
    } else {
        ctx.notify(
            NoticeLevel::Info,
            format!(
                "No board file at {}; showing an empty board.",
                opts.board_path.display()
            ),
        );
    }

    let date = opts.date.unwrap_or_else(|| Local::now().date_naive());
    let chrome = UiChrome::new();
    let display = DisplayManager::new();
    let mut out = io::stdout().lock();

    chrome.render_banner("Field service scheduling", &mut out)?;
    display.render_view(&ctx, opts.view, date, &mut out)?;
    if opts.show_config {
        display.render_config(&ctx.config, &mut out)?;
    }
    chrome.render_notices(&ctx.drain_notices(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
