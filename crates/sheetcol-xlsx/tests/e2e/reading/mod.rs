//! Reading tests - column metadata and column streaming from saved files.

mod columns;
mod streaming;
