pub mod ast;
pub mod compiler;
pub mod context;
pub mod generator;
pub mod identifier;
pub mod operations;
pub mod printer;
pub mod servers;

pub use generator::{ApiGenerator, generate_module};
