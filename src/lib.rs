//! Story Engine: a twee-style branching dialogue interpreter for games.
//!
//! A script is parsed into a raw model, linked into a graph of passages,
//! and then played: visiting a passage runs its macros against the player
//! state, and the visible text and options are recomputed from that state.
//!
//! ```
//! use story_engine::core::story::Story;
//!
//! let mut story = Story::builder()
//!     .script(":: Door\naddItem: key\n--\nHello.\n[if hasItem key]\nYou have a key.\n")
//!     .start("Door")
//!     .build()
//!     .unwrap();
//!
//! let door = story.start().unwrap();
//! assert_eq!(story.content(door).unwrap(), "Hello.\n");
//! story.visit_passage(door).unwrap();
//! assert_eq!(story.content(door).unwrap(), "Hello.\nYou have a key.\n");
//! ```

pub mod core;
pub mod schema;

pub use crate::core::loader::{LoadError, StoryBuilder, StoryManifest};
pub use crate::core::story::{Link, LinkId, Passage, PassageId, Story};
