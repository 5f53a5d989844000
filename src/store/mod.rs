//! Document store (Notion) access: finding the order page and patching it.

mod locator;
mod notion;
mod patcher;

#[cfg(test)]
mod locator_tests;
#[cfg(test)]
mod notion_tests;

pub use locator::{MatchMode, RecordLocator, RecordMatch, SearchStrategy};
pub use notion::NotionSettings;
pub use patcher::{PatchOutcome, RecordPatcher};
