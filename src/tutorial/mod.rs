//! The two walkthroughs. Each `run` is a straight-line script: build a value,
//! apply one operation, print the result.

pub mod arrays;
pub mod tables;
