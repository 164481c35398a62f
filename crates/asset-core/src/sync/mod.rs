//! Rate-limited documentation synchronization
//!
//! - **lock**: the persisted cooldown record and its on-disk store
//! - **manifest**: which remote pages map to which local files
//! - **groom**: content clean-up applied to fetched pages, including link
//!   rewriting
//! - **index**: regeneration of the documentation index section
//! - **engine**: the [`DocSyncer`] tying it together

mod engine;
mod groom;
mod index;
mod lock;
mod manifest;

pub use engine::{
    ChangeKind, DiffStat, DocSyncer, FetchError, Fetcher, FileChange, SyncOptions, SyncOutcome,
    SyncReport,
};
pub use groom::{LinkMap, rewrite_links, strip_shortcodes};
pub use index::{INDEX_HEADING, render_index_tree, replace_index_section};
pub use lock::{
    Clock, DEFAULT_COOLDOWN_HOURS, FixedClock, LOCK_FILENAME, LockStore, RunStatus, SyncLock,
    SystemClock, format_remaining,
};
pub use manifest::{MANIFEST_FILENAME, SyncManifest, SyncSource};
