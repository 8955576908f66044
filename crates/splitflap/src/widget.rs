//! The rotating split-flap widget.
//!
//! A [`SplitFlapWidget`] ties the pieces together: it loads the catalog once
//! when mounted, picks a random starting title, arms the rotation scheduler
//! and re-renders whenever the title or the container width changes.
//!
//! Everything that mutates widget state (timer ticks, resizes, reloads,
//! shutdown) is handled one at a time by [`SplitFlapWidget::run`], so a
//! resize and a tick arriving together are simply processed in turn.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::{TitleCatalog, DEFAULT_TITLES};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::render::DisplayRenderer;
use crate::rotation::{entropy_seed, RotationScheduler, RotationState, SchedulerState, Tick};
use crate::rows::{assemble_rows, DisplayRow, LayoutMode};
use crate::sizing::SizingProfile;
use crate::store::PersistenceStore;

/// Capacity of the widget's event queue.
const EVENT_QUEUE_DEPTH: usize = 32;

/// Host notifications delivered to a running widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// The container was re-measured at this width in pixels.
    Resize(f64),
    /// The catalog may have changed; read it again.
    Reload,
    /// Tear the widget down.
    Shutdown,
}

/// Knobs for a widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    /// Time between title changes.
    pub interval: Duration,
    /// Row layout.
    pub layout: LayoutMode,
    /// Sizing constants.
    pub sizing: SizingProfile,
    /// Container width before the first resize.
    pub container_width_px: f64,
    /// Seed for the starting index; random when `None`.
    pub seed: Option<u64>,
    /// Stop by itself after this many rotations.
    pub max_rotations: Option<u64>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl WidgetOptions {
    /// Options taken from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.rotation_interval(),
            layout: config.layout.mode,
            sizing: config.sizing_profile(),
            container_width_px: config.layout.container_width_px,
            seed: None,
            max_rotations: None,
        }
    }
}

/// Sends [`WidgetEvent`]s to a running widget.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tx: mpsc::Sender<WidgetEvent>,
}

impl WidgetHandle {
    /// Report a new container width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WidgetClosed`] if the widget has stopped.
    pub async fn resize(&self, width_px: f64) -> Result<()> {
        self.send(WidgetEvent::Resize(width_px)).await
    }

    /// Ask the widget to re-read its catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WidgetClosed`] if the widget has stopped.
    pub async fn reload(&self) -> Result<()> {
        self.send(WidgetEvent::Reload).await
    }

    /// Ask the widget to stop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WidgetClosed`] if the widget has already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(WidgetEvent::Shutdown).await
    }

    async fn send(&self, event: WidgetEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| Error::WidgetClosed)
    }
}

/// The rotating title display.
#[derive(Debug)]
pub struct SplitFlapWidget<S, R> {
    catalog: TitleCatalog<S>,
    renderer: R,
    options: WidgetOptions,
    titles: Vec<String>,
    rotation: Option<RotationState>,
    container_width_px: f64,
    scheduler: RotationScheduler,
    rotations: u64,
    events_tx: mpsc::Sender<WidgetEvent>,
    events_rx: Option<mpsc::Receiver<WidgetEvent>>,
}

impl<S, R> SplitFlapWidget<S, R>
where
    S: PersistenceStore,
    R: DisplayRenderer,
{
    /// A widget that has not been mounted yet.
    pub fn new(catalog: TitleCatalog<S>, renderer: R, options: WidgetOptions) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        Self {
            catalog,
            renderer,
            container_width_px: options.container_width_px,
            scheduler: RotationScheduler::new(options.interval),
            options,
            titles: Vec::new(),
            rotation: None,
            rotations: 0,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// A handle for delivering events to this widget.
    #[must_use]
    pub fn handle(&self) -> WidgetHandle {
        WidgetHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// What to show before mounting: the first built-in title on one row.
    #[must_use]
    pub fn placeholder(options: &WidgetOptions) -> Vec<DisplayRow> {
        assemble_rows(
            DEFAULT_TITLES[0],
            options.container_width_px,
            LayoutMode::WholeTitle,
            &LayoutMode::WholeTitle.profile(),
        )
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The titles loaded at mount (empty before).
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// The rotation position, once mounted.
    #[must_use]
    pub fn rotation(&self) -> Option<&RotationState> {
        self.rotation.as_ref()
    }

    /// The scheduler's lifecycle state.
    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Last measured container width.
    #[must_use]
    pub fn container_width_px(&self) -> f64 {
        self.container_width_px
    }

    /// Rotations performed since mounting.
    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    /// The title currently displayed, once mounted.
    #[must_use]
    pub fn current_title(&self) -> Option<&str> {
        let rotation = self.rotation.as_ref()?;
        self.titles.get(rotation.current_index()).map(String::as_str)
    }

    /// Rows for the current title at the current width.
    #[must_use]
    pub fn rows(&self) -> Vec<DisplayRow> {
        match self.current_title() {
            Some(title) => assemble_rows(
                title,
                self.container_width_px,
                self.options.layout,
                &self.options.sizing,
            ),
            None => Self::placeholder(&self.options),
        }
    }

    /// Mount the widget and process events until shutdown.
    ///
    /// The scheduler is always cancelled before this returns, including on
    /// error. A widget can only be run once.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails, the scheduler cannot start, or
    /// the widget was already run.
    pub async fn run(&mut self) -> Result<()> {
        let Some(mut events) = self.events_rx.take() else {
            return Err(Error::WidgetClosed);
        };

        let result = self.event_loop(&mut events).await;
        self.scheduler.cancel();
        events.close();
        info!(rotations = self.rotations, "split-flap widget stopped");
        result
    }

    async fn event_loop(&mut self, events: &mut mpsc::Receiver<WidgetEvent>) -> Result<()> {
        let mut ticks = self.mount().await?;
        if self.rotation_limit_reached() {
            return Ok(());
        }

        loop {
            let event = tokio::select! {
                Some(tick) = ticks.recv() => Step::Tick(tick),
                event = events.recv() => Step::Event(event),
            };

            match event {
                Step::Tick(tick) => {
                    self.on_tick(tick).await?;
                    if self.rotation_limit_reached() {
                        return Ok(());
                    }
                }
                Step::Event(Some(WidgetEvent::Resize(width))) => self.on_resize(width).await?,
                Step::Event(Some(WidgetEvent::Reload)) => self.on_reload().await?,
                Step::Event(Some(WidgetEvent::Shutdown) | None) => return Ok(()),
            }
        }
    }

    fn rotation_limit_reached(&self) -> bool {
        self.options
            .max_rotations
            .is_some_and(|max| self.rotations >= max)
    }

    /// Load titles, choose the starting index, draw, then arm the timer.
    async fn mount(&mut self) -> Result<mpsc::Receiver<Tick>> {
        self.titles = self.catalog.get_titles();
        let seed = self.options.seed.unwrap_or_else(entropy_seed);
        let rotation = RotationState::new(self.titles.len(), seed);
        info!(
            titles = self.titles.len(),
            start = rotation.current_index(),
            "mounting split-flap widget"
        );
        self.rotation = Some(rotation);

        self.render().await?;
        let (tick_tx, tick_rx) = mpsc::channel(1);
        self.scheduler.start(tick_tx)?;
        Ok(tick_rx)
    }

    async fn on_tick(&mut self, tick: Tick) -> Result<()> {
        if let Some(rotation) = self.rotation.as_mut() {
            let index = rotation.advance();
            debug!(sequence = tick.sequence, index, "rotating title");
        }
        self.rotations += 1;
        self.render().await
    }

    async fn on_resize(&mut self, width_px: f64) -> Result<()> {
        debug!(width_px, "container resized");
        self.container_width_px = width_px;
        self.render().await
    }

    async fn on_reload(&mut self) -> Result<()> {
        self.titles = self.catalog.get_titles();
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.set_len(self.titles.len());
        }
        debug!(titles = self.titles.len(), "catalog reloaded");
        self.render().await
    }

    async fn render(&mut self) -> Result<()> {
        let rows = self.rows();
        self.renderer.render(&rows).await
    }
}

enum Step {
    Tick(Tick),
    Event(Option<WidgetEvent>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_titles;
    use crate::render::RecordingRenderer;
    use crate::store::{MemoryStore, SqliteStore};

    type TestWidget = SplitFlapWidget<MemoryStore, RecordingRenderer>;

    fn options(seed: u64) -> WidgetOptions {
        WidgetOptions {
            seed: Some(seed),
            ..WidgetOptions::default()
        }
    }

    fn widget_with_titles(titles: &[&str], opts: WidgetOptions) -> TestWidget {
        let mut catalog = TitleCatalog::new(MemoryStore::new());
        let titles: Vec<String> = titles.iter().map(ToString::to_string).collect();
        catalog.save_titles(&titles).unwrap();
        SplitFlapWidget::new(catalog, RecordingRenderer::new(), opts)
    }

    #[test]
    fn test_placeholder_is_first_default_title() {
        let rows = TestWidget::placeholder(&WidgetOptions::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "PRODUCT ENGINEER");
    }

    #[test]
    fn test_unmounted_widget_shows_placeholder() {
        let widget = widget_with_titles(&["A"], options(0));
        assert!(widget.current_title().is_none());
        assert_eq!(widget.rows()[0].text, "PRODUCT ENGINEER");
        assert_eq!(widget.scheduler_state(), SchedulerState::Unstarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_renders_seeded_title() {
        let mut widget = widget_with_titles(
            &["Zero-to-One Builder", "Dad"],
            WidgetOptions {
                max_rotations: Some(1),
                ..options(2)
            },
        );
        widget.run().await.unwrap();

        let frames = widget.renderer().frames();
        // Seed 2 over two titles starts at index 0, then rotates once.
        assert_eq!(frames.len(), 2);
        let first: Vec<&str> = frames[0].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(first, ["ZERO-TO-ONE", "BUILDER"]);
        assert_eq!(widget.renderer().last_texts(), ["DAD"]);
        assert_eq!(widget.scheduler_state(), SchedulerState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_cycles_through_catalog() {
        let mut widget = widget_with_titles(
            &["One", "Two", "Three"],
            WidgetOptions {
                max_rotations: Some(3),
                ..options(1)
            },
        );
        widget.run().await.unwrap();

        let shown: Vec<String> = widget
            .renderer()
            .frames()
            .iter()
            .map(|rows| rows[0].text.clone())
            .collect();
        assert_eq!(shown, ["TWO", "THREE", "ONE", "TWO"]);
        assert_eq!(widget.rotation().unwrap().current_index(), 1);
        assert_eq!(widget.rotations(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_defaults_used_when_catalog_corrupt() {
        let catalog = TitleCatalog::new(MemoryStore::with_value(
            crate::catalog::TITLES_KEY,
            "not json",
        ));
        let mut widget = SplitFlapWidget::new(
            catalog,
            RecordingRenderer::new(),
            WidgetOptions {
                max_rotations: Some(1),
                ..options(0)
            },
        );
        widget.run().await.unwrap();
        assert_eq!(widget.titles(), default_titles().as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_recomputes_sizes() {
        let mut widget = widget_with_titles(&["Pizza Chef"], options(0));
        let handle = widget.handle();

        let driver = tokio::spawn(async move {
            handle.resize(100.0).await.unwrap();
            handle.resize(1000.0).await.unwrap();
            handle.shutdown().await.unwrap();
        });
        widget.run().await.unwrap();
        driver.await.unwrap();

        let frames = widget.renderer().frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1][0].font_size_px, 18.0);
        assert_eq!(frames[2][0].font_size_px, 48.0);
        assert_eq!(widget.container_width_px(), 1000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_shrinks_index_into_range() {
        let db_path = std::env::temp_dir().join(format!(
            "splitflap_test_reload_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_path);

        let mut catalog = TitleCatalog::new(SqliteStore::open(&db_path).unwrap());
        catalog
            .save_titles(&["A", "B", "C", "D"].map(String::from))
            .unwrap();
        let mut widget = SplitFlapWidget::new(catalog, RecordingRenderer::new(), options(3));
        let handle = widget.handle();

        let editor_path = db_path.clone();
        let driver = tokio::spawn(async move {
            let mut editor = TitleCatalog::new(SqliteStore::open(&editor_path).unwrap());
            editor.save_titles(&["X", "Y"].map(String::from)).unwrap();
            handle.reload().await.unwrap();
            handle.shutdown().await.unwrap();
        });
        widget.run().await.unwrap();
        driver.await.unwrap();

        assert_eq!(widget.renderer().frames()[0][0].text, "D");
        assert_eq!(widget.titles(), ["X", "Y"]);
        // Index 3 over the new length 2 is index 1.
        assert_eq!(widget.rotation().unwrap().current_index(), 1);
        assert_eq!(widget.renderer().last_texts(), ["Y"]);

        drop(widget);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_rotation_limit_stops_after_mount() {
        let mut widget = widget_with_titles(
            &["One", "Two"],
            WidgetOptions {
                max_rotations: Some(0),
                ..options(0)
            },
        );
        let started = tokio::time::Instant::now();
        widget.run().await.unwrap();

        assert_eq!(widget.rotations(), 0);
        assert_eq!(widget.renderer().frames().len(), 1);
        assert_eq!(widget.renderer().last_texts(), ["ONE"]);
        assert!(started.elapsed() < widget.options.interval);
        assert_eq!(widget.scheduler_state(), SchedulerState::Cancelled);
    }

    /// Takes a second to draw each frame and notes when each draw began.
    #[derive(Debug, Default)]
    struct SlowRenderer {
        started: Vec<tokio::time::Instant>,
    }

    #[async_trait::async_trait]
    impl DisplayRenderer for SlowRenderer {
        async fn render(&mut self, _rows: &[DisplayRow]) -> Result<()> {
            self.started.push(tokio::time::Instant::now());
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_armed_after_first_render() {
        let mut catalog = TitleCatalog::new(MemoryStore::new());
        catalog.save_titles(&["A", "B"].map(String::from)).unwrap();
        let mut widget = SplitFlapWidget::new(
            catalog,
            SlowRenderer::default(),
            WidgetOptions {
                max_rotations: Some(1),
                ..options(0)
            },
        );
        widget.run().await.unwrap();

        let started = &widget.renderer().started;
        assert_eq!(started.len(), 2);
        // One full interval after the first frame finished drawing.
        assert_eq!(
            started[1] - started[0],
            Duration::from_secs(1) + widget.options.interval
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_scheduler_and_closes_handle() {
        let mut widget = widget_with_titles(&["A"], options(0));
        let handle = widget.handle();
        handle.shutdown().await.unwrap();

        widget.run().await.unwrap();
        assert_eq!(widget.scheduler_state(), SchedulerState::Cancelled);
        assert!(matches!(
            handle.resize(10.0).await,
            Err(Error::WidgetClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_twice_is_an_error() {
        let mut widget = widget_with_titles(&["A"], options(0));
        widget.handle().shutdown().await.unwrap();
        widget.run().await.unwrap();

        assert!(matches!(widget.run().await, Err(Error::WidgetClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_whole_title_layout() {
        let mut widget = widget_with_titles(
            &["Software Seuss"],
            WidgetOptions {
                layout: LayoutMode::WholeTitle,
                sizing: SizingProfile::WHOLE_TITLE,
                ..options(0)
            },
        );
        widget.handle().shutdown().await.unwrap();
        widget.run().await.unwrap();

        assert_eq!(widget.renderer().last_texts(), ["SOFTWARE SEUSS"]);
    }
}
