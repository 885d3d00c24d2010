pub mod lines;
pub mod split;
