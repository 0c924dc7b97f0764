//! In-memory console transcript store with cascading incremental filters.
//!
//! This crate is the record store behind a scripted command shell's console
//! window: a scrolling transcript of commands and replies, static
//! command-reference text, and search-as-you-type filtering over both. The
//! GUI and the host process that actually executes commands are
//! collaborators behind traits; what lives here is the data model and the
//! algorithms that make a 10k-record transcript feel instant.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐     ┌───────────────┐     ┌──────────────┐
//! │  text.rs  │────▶│   index.rs    │────▶│   store.rs   │
//! │ (folding, │     │ (8-byte bit-  │     │ (arena +     │
//! │  clipping)│     │ packed entry) │     │  counters)   │
//! └───────────┘     └───────────────┘     └──────┬───────┘
//!                                                │
//!            ┌──────────────┬────────────────────┼──────────────┐
//!            ▼              ▼                    ▼              ▼
//!     ┌────────────┐ ┌──────────────┐  ┌──────────────┐ ┌────────────┐
//!     │ filter.rs  │ │transcript.rs │  │   help.rs    │ │ console.rs │
//!     │ (cascading │ │ (save/load,  │  │ (ingestion,  │ │ (context,  │
//!     │   tiers)   │ │  run files)  │  │ completions) │ │  aliases)  │
//!     └────────────┘ └──────────────┘  └──────────────┘ └────────────┘
//! ```
//!
//! # The short version
//!
//! - Records live in an append-only byte arena, addressed by 8-byte
//!   bit-packed index entries ([`index`], [`store`]).
//! - Filtering cascades through a ladder of cached tiers so cost tracks
//!   query growth, not store size ([`filter`]).
//! - Aliases splice records out of the middle of an arena with offset
//!   repair ([`store::HelpStore::remove`], [`console`]).
//! - The transcript round-trips through a flat line format that re-derives
//!   its sequence counters on reload ([`transcript`]).

pub mod console;
pub mod error;
pub mod filter;
pub mod help;
pub mod index;
pub mod settings;
pub mod store;
pub mod text;
pub mod transcript;

// Re-exports for the public API
pub use console::{Console, Event, Executor, FilterTarget};
pub use error::{ConsoleError, Result};
pub use filter::{CascadeFilter, DEFAULT_LADDER};
pub use help::{build_help_store, load_help_file, load_help_files, HelpCatalog, HelpRecord};
pub use index::{HelpIndex, LogIndex, RecordIndex};
pub use settings::Settings;
pub use store::{HelpStore, LogStore};
pub use transcript::{load_log, load_run, save_log};
