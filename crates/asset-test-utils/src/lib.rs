//! Shared test utilities for the asset pipeline workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`tree`]: [`SkillTree`](tree::SkillTree) builder for source and target
//!   directories
//! - [`http`]: one-shot local HTTP servers standing in for remote endpoints

pub mod http;
pub mod tree;
