pub mod app;
pub mod charmap;
pub mod cli;
pub mod convert;
pub mod document;
pub mod history;
pub mod matcher;
pub mod paths;
pub mod settings;
pub mod walk;
