//! Link backends
//!
//! The installer only talks to a [`LinkBackend`], so a platform without
//! native symlinks can swap in a different strategy while keeping the same
//! state classification and conflict rules.

use asset_fs::EntryKind;
use asset_fs::link;

use super::mapping::{LinkMapping, LinkState};

/// Strategy for observing and materializing link mappings.
pub trait LinkBackend {
    /// Classify what currently occupies `mapping.target`.
    fn inspect(&self, mapping: &LinkMapping) -> asset_fs::Result<LinkState>;

    /// Materialize a mapping whose target is absent.
    fn create(&self, mapping: &LinkMapping) -> asset_fs::Result<()>;

    /// Replace a link owned by this backend so it points at `mapping.source`.
    ///
    /// Implementations must refuse when the target is not one of their links.
    fn repoint(&self, mapping: &LinkMapping) -> asset_fs::Result<()>;
}

impl<B: LinkBackend + ?Sized> LinkBackend for &B {
    fn inspect(&self, mapping: &LinkMapping) -> asset_fs::Result<LinkState> {
        (**self).inspect(mapping)
    }

    fn create(&self, mapping: &LinkMapping) -> asset_fs::Result<()> {
        (**self).create(mapping)
    }

    fn repoint(&self, mapping: &LinkMapping) -> asset_fs::Result<()> {
        (**self).repoint(mapping)
    }
}

/// Native filesystem symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymlinkBackend;

impl LinkBackend for SymlinkBackend {
    fn inspect(&self, mapping: &LinkMapping) -> asset_fs::Result<LinkState> {
        let state = match link::entry_kind(&mapping.target)? {
            EntryKind::Missing => LinkState::Absent,
            EntryKind::Symlink(text) => {
                let current = link::absolutize_link_text(&mapping.target, &text);
                if link::same_location(&current, &mapping.source) {
                    LinkState::CorrectLink
                } else {
                    LinkState::WrongLink { current }
                }
            }
            EntryKind::File => LinkState::OccupiedByRealFile,
            EntryKind::Directory => LinkState::OccupiedByRealDirectory,
        };
        Ok(state)
    }

    fn create(&self, mapping: &LinkMapping) -> asset_fs::Result<()> {
        link::create_dir_link(&mapping.source, &mapping.target)
    }

    fn repoint(&self, mapping: &LinkMapping) -> asset_fs::Result<()> {
        link::replace_link(&mapping.source, &mapping.target)
    }
}
