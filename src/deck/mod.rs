//! New presentations from a [`Deck`](crate::model::Deck).
//!
//! The writer emits a minimal PresentationML package: one master, one
//! "Title and Content" layout, one theme and a slide per deck entry with a
//! title placeholder and a body placeholder.

pub mod template;
mod writer;

pub use writer::{DeckOptions, DeckSummary, DeckWriter};
