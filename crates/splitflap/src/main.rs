//! `flap` - CLI for splitflap
//!
//! Runs the rotating display on the terminal and manages the stored title
//! list.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use splitflap::cli::{
    Cli, Command, ConfigCommand, LayoutArg, PreviewCommand, RunCommand, TitlesCommand,
};
use splitflap::{
    assemble_rows, init_logging, Config, DisplayRenderer, MemoryStore, NullStore,
    PersistenceStore, SplitFlapWidget, SqliteStore, StoreBackend, TerminalRenderer, TitleCatalog,
    WidgetHandle, WidgetOptions,
};

type DynStore = Box<dyn PersistenceStore + Send>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Run(run_cmd) => handle_run(&config, &run_cmd).await,
        Command::Preview(preview_cmd) => handle_preview(&config, &preview_cmd).await,
        Command::Titles(titles_cmd) => handle_titles(&config, titles_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_catalog(config: &Config) -> anyhow::Result<TitleCatalog<DynStore>> {
    let store: DynStore = match config.storage.backend {
        StoreBackend::Sqlite => {
            let path = config.database_path();
            Box::new(
                SqliteStore::open(&path)
                    .with_context(|| format!("opening title store {}", path.display()))?,
            )
        }
        StoreBackend::Memory => Box::new(MemoryStore::new()),
        StoreBackend::None => Box::new(NullStore),
    };
    debug!(backend = %config.storage.backend, "opened title store");
    Ok(TitleCatalog::with_key(store, config.storage.titles_key.clone()))
}

/// Config with the layout overridden, so sizing follows the chosen layout.
fn with_layout(config: &Config, layout: Option<LayoutArg>) -> anyhow::Result<Config> {
    match layout {
        Some(layout) => config
            .with_layout_mode(layout.into())
            .context("applying --layout"),
        None => Ok(config.clone()),
    }
}

async fn handle_run(config: &Config, cmd: &RunCommand) -> anyhow::Result<()> {
    let config = with_layout(config, cmd.layout)?;
    let mut options = WidgetOptions::from_config(&config);
    if let Some(width) = cmd.width {
        options.container_width_px = width;
    }
    options.max_rotations = cmd.ticks;

    let renderer = TerminalRenderer::new(
        tokio::io::stdout(),
        config.flip_interval(),
        config.flap.animate && !cmd.no_animate,
    );
    let mut widget = SplitFlapWidget::new(open_catalog(&config)?, renderer, options);

    let handle = widget.handle();
    let resize = spawn_resize_listener(widget.handle())?;
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && handle.shutdown().await.is_err() {
            warn!("display already stopped");
        }
    });

    let result = widget.run().await;
    interrupt.abort();
    if let Some(resize) = resize {
        resize.abort();
    }
    result.context("running display")
}

/// Re-measure the terminal on every window change and resize the widget.
#[cfg(unix)]
fn spawn_resize_listener(handle: WidgetHandle) -> anyhow::Result<Option<JoinHandle<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut window_change =
        signal(SignalKind::window_change()).context("listening for terminal resizes")?;
    Ok(Some(tokio::spawn(async move {
        while window_change.recv().await.is_some() {
            let Some(width_px) = splitflap::render::terminal_width_px() else {
                debug!("terminal size unavailable, keeping current width");
                continue;
            };
            if handle.resize(width_px).await.is_err() {
                break;
            }
        }
    })))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn spawn_resize_listener(_handle: WidgetHandle) -> anyhow::Result<Option<JoinHandle<()>>> {
    Ok(None)
}

async fn handle_preview(config: &Config, cmd: &PreviewCommand) -> anyhow::Result<()> {
    let config = with_layout(config, cmd.layout)?;
    let width = cmd.width.unwrap_or(config.layout.container_width_px);
    let rows = assemble_rows(
        &cmd.title,
        width,
        config.layout.mode,
        &config.sizing_profile(),
    );

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("(blank title, nothing to show)");
        return Ok(());
    }
    let mut renderer = TerminalRenderer::new(tokio::io::stdout(), config.flip_interval(), false);
    renderer.render(&rows).await?;
    Ok(())
}

fn handle_titles(config: &Config, cmd: TitlesCommand) -> anyhow::Result<()> {
    let mut catalog = open_catalog(config)?;

    match cmd {
        TitlesCommand::List { json } => {
            let titles = catalog.get_titles();
            if json {
                println!("{}", serde_json::to_string_pretty(&titles)?);
            } else {
                let source = if catalog.is_customized() {
                    "custom"
                } else {
                    "defaults"
                };
                println!("Titles ({source})");
                println!("==============");
                for (i, title) in titles.iter().enumerate() {
                    println!("{:>3}. {title}", i + 1);
                }
            }
        }
        TitlesCommand::Set { titles } => {
            catalog.save_titles(&titles)?;
            println!("Saved {} titles.", titles.len());
        }
        TitlesCommand::Reset => {
            catalog.reset_titles()?;
            println!("Titles reset to defaults.");
        }
        TitlesCommand::Defaults => {
            for title in catalog.get_default_titles() {
                println!("{title}");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let sizing = config.sizing_profile();
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!("  Titles key:         {}", config.storage.titles_key);
                println!();
                println!("[Rotation]");
                println!("  Interval (ms):      {}", config.rotation.interval_ms);
                println!();
                println!("[Layout]");
                println!("  Mode:               {}", config.layout.mode);
                println!("  Container width:    {}px", config.layout.container_width_px);
                println!();
                println!("[Sizing]");
                println!("  Padding:            {}px", sizing.padding_px);
                println!("  Char width factor:  {}", sizing.char_width_factor);
                println!(
                    "  Font size range:    {}px - {}px",
                    sizing.min_size_px, sizing.max_size_px
                );
                println!();
                println!("[Flap]");
                println!("  Flip (ms):          {}", config.flap.flip_ms);
                println!("  Animate:            {}", config.flap.animate);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
