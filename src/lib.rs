//! md-slides: a slide document model for markdown decks.
//!
//! One markdown buffer becomes a deck of slides. The crate covers everything
//! between the editor and the screen:
//!
//! - **Segmentation** - split text into slide spans on `---` lines
//! - **Configuration** - merge defaults, persisted settings and front-matter
//! - **Render dispatch** - pick the best renderer available, degrade per slide
//! - **Navigation** - a clamped current-slide state machine
//! - **Reconciliation** - turn text and settings into immutable snapshots
//! - **Persistence and export** - settings/document stores, standalone HTML
//!
//! # Quick Start
//!
//! ```rust
//! use md_slides::{Session, SettingsLayer};
//!
//! let mut session = Session::default();
//! session.edit("# Hello\n---\n# World", &SettingsLayer::default());
//! session.next();
//!
//! assert_eq!(session.counter_label(), "2 / 2");
//! assert_eq!(session.snapshot().rendered()[1].html, "<h1>World</h1>\n");
//! ```
//!
//! # Features
//!
//! - `markdown` - Enables [`PulldownRenderer`], a pulldown-cmark markdown backend
//! - `cli` - Builds the `md-slides` binary

// Slide boundaries and front-matter
pub mod segment;

// Effective configuration
pub mod config;

// Renderer chain and fallbacks
pub mod render;

// Current-slide state
pub mod nav;

// Snapshots and stale-render handling
pub mod reconcile;

pub mod session;

pub mod store;

pub mod export;

pub mod error;

// Re-export segmentation types
pub use segment::{
    FrontMatter, Segmentation, SlideSpan, join_slides, segment, segment_document,
    split_front_matter,
};

// Re-export config types
pub use config::{
    AspectRatio, Color, EffectiveConfig, FontSize, FontSizeMode, ParseValueError, SettingsLayer,
    merge, merge_with_front_matter, parse_front_matter,
};

// Re-export render types
pub use render::{
    Capabilities, Dispatcher, ExternalMarkdownRenderer, ExternalSlideRenderer, FullRenderer,
    MinimalRenderer, OutputDelimiter, PLACEHOLDER_HTML, PlainRenderer, RenderError,
    RenderedSlide, Renderer, RendererKind, SlideBlob,
};

#[cfg(feature = "markdown")]
pub use render::PulldownRenderer;

pub use nav::NavigationState;

pub use reconcile::{Outcome, PendingRender, Prepared, Reconciler, ViewSnapshot};

pub use session::Session;

pub use store::{FileStore, MemoryStore, PersistenceStore, load_settings, save_settings};

pub use export::{Exporter, HtmlExporter};

pub use error::{Result, SlidesError};
