pub mod check;
pub mod output;
pub mod render;
pub mod speak;
