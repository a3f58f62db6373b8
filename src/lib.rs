pub mod app;
pub mod download;
pub mod error;
pub mod event;
pub mod settings;
pub mod status;
pub mod submission;
pub mod ui;
pub mod vim;
pub mod wizard;
