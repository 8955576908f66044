//! `splitflap` - a rotating split-flap title display
//!
//! This library cycles through a short list of titles and lays each one out
//! as rows of split-flap cells sized to fill a container. The title list can
//! be customized and is kept in a small durable store, with the built-in
//! list as the fallback whenever nothing valid is stored.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod flap;
pub mod logging;
pub mod render;
pub mod rotation;
pub mod rows;
pub mod sizing;
pub mod store;
pub mod tokenizer;
pub mod widget;

pub use catalog::{TitleCatalog, DEFAULT_TITLES, TITLES_KEY};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use render::{DisplayRenderer, RecordingRenderer, TerminalRenderer};
pub use rotation::{RotationScheduler, RotationState, SchedulerState};
pub use rows::{assemble_rows, DisplayRow, LayoutMode};
pub use sizing::{compute_font_size, SizingProfile};
pub use store::{MemoryStore, NullStore, PersistenceStore, SqliteStore, StoreBackend};
pub use tokenizer::{split_title, Word};
pub use widget::{SplitFlapWidget, WidgetEvent, WidgetHandle, WidgetOptions};
