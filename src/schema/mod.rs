//! Data shared between the parser, the story graph and host applications.

pub mod event;
pub mod raw;
