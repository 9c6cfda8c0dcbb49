//! Core translation pipeline

pub mod mathcad2latex;
pub mod refine;
