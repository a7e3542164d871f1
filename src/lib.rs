pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod packer;
pub mod render;
pub mod strategy;
pub mod types;

pub use packer::{Packer, pack};
