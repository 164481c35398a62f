//! Link installation
//!
//! Turns scanned [`AssetUnit`](crate::AssetUnit)s into links under a target
//! root. Every unit maps to `target_root/<name>`; the observed state of that
//! path decides the action:
//!
//! | state                        | action                 |
//! |------------------------------|------------------------|
//! | `Absent`                     | create link            |
//! | `CorrectLink`                | nothing                |
//! | `WrongLink`                  | repoint link           |
//! | `OccupiedByRealFile`         | conflict, left alone   |
//! | `OccupiedByRealDirectory`    | conflict, left alone   |

mod backend;
mod installer;
mod mapping;
mod report;

pub use backend::{LinkBackend, SymlinkBackend};
pub use installer::{InstallOptions, LinkInstaller};
pub use mapping::{LinkMapping, LinkState};
pub use report::{InstallReport, UnitOutcome, UnitReport};
