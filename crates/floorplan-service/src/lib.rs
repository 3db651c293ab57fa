//! Voice-to-plan service library
//!
//! Provides the drawing orchestrator and the HTTP surface around it.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod server;
pub mod types;

pub use config::ServiceConfig;
pub use error::{AppError, Result, ServiceError};
pub use orchestrator::{DrawingService, GeneratedDrawing};
pub use server::{create_router, start_server, ServerState, SharedState};
