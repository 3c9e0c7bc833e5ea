//! Library surface of the linewatch CLI, split out so rendering can be
//! exercised by tests.

pub mod render;
