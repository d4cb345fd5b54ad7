//! # vv-av
//!
//! External media tool plumbing for vidvault.
//!
//! - **Tool discovery** ([`ToolRegistry`]) finds ffmpeg via configuration or
//!   `PATH`.
//! - **Command execution** ([`ToolCommand`]) runs a tool capturing output, or
//!   streams a reader through it into a writer.
//! - **Workspaces** ([`Workspace`]) are temp dirs for runs that need real
//!   files.
//! - **Frame extraction** ([`frame`]) and **transcoding** ([`transcode`])
//!   carry the stable ffmpeg argument conventions.

pub mod command;
pub mod error;
pub mod frame;
pub mod tools;
pub mod transcode;
pub mod workspace;

pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use frame::{extract_frame_file, extract_frame_piped};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use transcode::transcode_file;
pub use workspace::Workspace;
