//! Card search results: acquiring the result set, routing on its size,
//! binding rows for display, fast-scroll indexing and random browsing.

pub mod card;
pub mod config_file;
pub mod controller;
pub mod criteria;
pub mod events;
pub mod glyph;
pub mod presenter;
pub mod result_set;
pub mod scroll;
pub mod section_index;
pub mod shuffle;
pub mod store;

// Re-export for convenience
pub use card::{CardRecord, Loyalty, Rarity, Stat};
pub use config_file::{ConfigFile, DisplayFieldSelection, PreferenceStore};
pub use controller::{EntryOutcome, ResultListScreen, ResultQuery, SavedScreen, ScreenContext, enter};
pub use criteria::{Logic, NumericFilter, SearchCriteria, SetLogic};
pub use events::{DetailRequest, Navigation, Notification, ScreenEvent};
pub use glyph::{BraceGlyphs, GlyphFormatter, RichText, Segment};
pub use presenter::{Color, RarityPalette, RowView};
pub use result_set::ResultSet;
pub use scroll::{FixedRowViewport, ListViewport, ScrollAnchor};
pub use section_index::AlphabetIndex;
pub use store::{CardStore, MemoryCardStore, StoreError};
