//! Main application entry point.

use clap::Parser;
use slidegrid_app::cli::{Cli, Command};
use slidegrid_app::{Script, Session, SessionError, ShortcutRegistry};
use slidegrid_core::config::EditorConfig;
use slidegrid_core::format::PageFormat;
use slidegrid_core::template::{TemplateCategory, by_category};
use slidegrid_render::compositor::CanvasLayout;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_filter()),
    )
    .init();
    log::info!("Starting SlideGrid");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SessionError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Run {
            script,
            export_dir,
            json,
        } => {
            let script = Script::load(&script)?;
            let mut session = Session::new(&config);
            if let Some(dir) = export_dir {
                session = session.with_export_dir(dir);
            }
            session.run(&script)?;

            let layout = session.layout();
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print_summary(&session, &layout);
            }
            for path in session.exports() {
                println!("exported {}", path.display());
            }
        }
        Command::Templates => {
            for category in TemplateCategory::ALL {
                println!("{}", category.label());
                for template in by_category(category) {
                    println!(
                        "  {:12} {:14} {}x{}",
                        template.block_type.name(),
                        template.label,
                        template.default_width,
                        template.default_height
                    );
                }
            }
        }
        Command::Formats => {
            for format in PageFormat::ALL {
                let size = format.size();
                println!(
                    "  {:12} {:>5} x {:<5} {}",
                    format.name(),
                    size.width,
                    size.height,
                    format.label()
                );
            }
        }
        Command::Shortcuts => println!("{}", ShortcutRegistry::table()),
    }
    Ok(())
}

fn print_summary(session: &Session, layout: &CanvasLayout) {
    let store = session.store();
    println!(
        "page {}/{} {}  zoom {:.0}%  grid {}",
        store.current_page_index() + 1,
        store.pages().len(),
        layout.format,
        store.zoom() * 100.0,
        if layout.grid_lines.is_empty() { "off" } else { "on" }
    );
    for block in &layout.blocks {
        let model = store.block(&block.id);
        let (x, y, w, h) = model
            .map(|b| (b.x, b.y, b.width, b.height))
            .unwrap_or_default();
        println!(
            "  {}{:12} cell ({}, {}) {}x{}  px ({:.0}, {:.0}) {:.0}x{:.0}",
            if block.selected { "*" } else { " " },
            block.block_type.name(),
            x,
            y,
            w,
            h,
            block.rect.x0,
            block.rect.y0,
            block.rect.width(),
            block.rect.height()
        );
    }
    for summary in store.page_summaries() {
        let preview: Vec<_> = summary.preview.iter().map(|t| t.name()).collect();
        println!(
            "  {} page {} ({} blocks) {}",
            if summary.is_current { ">" } else { " " },
            summary.index + 1,
            summary.block_count,
            preview.join(", ")
        );
    }
}
