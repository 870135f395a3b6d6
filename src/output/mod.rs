// file: src/output/mod.rs
// description: presentation layer module exports
// reference: internal module structure

pub mod terminal;

pub use terminal::TerminalPresenter;
