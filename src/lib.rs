//! Walkthroughs of n-dimensional arrays (`array`, over `ndarray`) and
//! labeled tables (`data`), driven by the scripts in `tutorial`.

pub mod array;
pub mod data;
pub mod tutorial;
