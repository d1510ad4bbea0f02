//! duet - side-by-side document diff in the terminal

mod app;
mod config;
mod logging;
mod views;

use anyhow::{Context, Result};
use app::{App, Document};
use clap::Parser;
use config::{Config, Palette};
use crossterm::event::{self, Event, KeyEventKind};
use duet_core::{
    prepare, CompareOptions, DiffBuilder, Granularity, HighlightMode, MarkupFormat, SimilarEngine,
};
use ratatui::{
    layout::{Constraint, Layout},
    DefaultTerminal,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "duet", version, about = "Side-by-side diff for Markdown, wiki markup and plain text")]
struct Args {
    /// Left (old) document
    left: PathBuf,

    /// Right (new) document
    right: PathBuf,

    /// Markup format of both documents: plain, markdown or wiki (default: guess from extension)
    #[arg(short, long)]
    format: Option<MarkupFormat>,

    /// Markup format of the left document
    #[arg(long)]
    left_format: Option<MarkupFormat>,

    /// Markup format of the right document
    #[arg(long)]
    right_format: Option<MarkupFormat>,

    /// Treat CJK punctuation as its ASCII equivalent
    #[arg(short = 'p', long)]
    ignore_punctuation: bool,

    /// Highlight mode: smart, line or char
    #[arg(short, long)]
    mode: Option<HighlightMode>,

    /// Sub-line granularity of modified rows: char or word
    #[arg(short, long)]
    granularity: Option<Granularity>,

    /// Print the diff model as JSON and exit
    #[arg(long, conflicts_with = "extract")]
    json: bool,

    /// Print the extracted plain text of both documents and exit
    #[arg(long)]
    extract: bool,

    /// Config file (default: <config_dir>/duet/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn format_for(&self, side: Option<MarkupFormat>, path: &Path) -> MarkupFormat {
        side.or(self.format)
            .unwrap_or_else(|| MarkupFormat::from_path(path))
    }

    fn compare_options(&self, config: &Config) -> CompareOptions {
        CompareOptions::new()
            .with_formats(
                self.format_for(self.left_format, &self.left),
                self.format_for(self.right_format, &self.right),
            )
            .with_ignore_punctuation(self.ignore_punctuation || config.ignore_punctuation)
            .with_granularity(self.granularity.unwrap_or(config.granularity))
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document { name, raw })
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(!(args.json || args.extract));

    let config = Config::load(args.config.as_deref())?;
    let options = args.compare_options(&config);
    tracing::debug!(?options, "resolved compare options");

    if args.json {
        let builder = DiffBuilder::new(SimilarEngine::new().with_granularity(options.granularity));
        let result = builder
            .diff_files(&args.left, &args.right, &options)
            .context("failed to compare documents")?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let left = read_document(&args.left)?;
    let right = read_document(&args.right)?;

    if args.extract {
        for (doc, format) in [(&left, options.left_format), (&right, options.right_format)] {
            println!("==> {} ({format}) <==", doc.name);
            println!("{}", prepare(&doc.raw, format, options.ignore_punctuation));
        }
        return Ok(());
    }

    let palette = config.palette().context("invalid theme")?;
    let mode = args.mode.unwrap_or(config.highlight);
    let mut app = App::new(left, right, options, mode).context("failed to compare documents")?;

    let mut terminal = ratatui::init();
    let outcome = run(&mut terminal, &mut app, &palette);
    ratatui::restore();
    outcome
}

fn run(terminal: &mut DefaultTerminal, app: &mut App, palette: &Palette) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| {
            let [main, status] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
            views::render_side_by_side(frame, app, palette, main);
            views::render_status(frame, app, status);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }
    Ok(())
}
