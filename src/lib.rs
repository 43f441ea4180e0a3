pub mod cli;
pub mod compare;
pub mod config;
pub mod mcp;
pub mod movie;
pub mod provider;
pub mod render;
