pub mod assets;
pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
