//! Editing tests - mutate a saved file, save it again and read it back.

mod metadata;
mod structure;
