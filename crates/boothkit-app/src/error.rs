//! Errors surfaced by the command-line front end.

use boothkit_core::{ConfigError, EditorError, StoreError, TemplateError};
use boothkit_render::RendererError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("template: {0}")]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("render: {0}")]
    Render(#[from] RendererError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type CliResult<T> = Result<T, CliError>;
