//! Slide deck model.
//!
//! The markdown parser produces these structures and the deck writer turns
//! them into PresentationML.

mod deck;

pub use deck::*;
