//! # Storyline Common Library
//!
//! Shared code for the Storyline submission services including:
//! - Event types (StorylineEvent enum) and the EventBus
//! - Bootstrap configuration loading
//! - Error types
//! - Utility functions

pub mod config;
pub mod error;
pub mod events;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
