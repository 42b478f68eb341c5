//! Core frame contracts.
//!
//! This module defines the stable interface between the loop (shell/host),
//! the graphics backend and the drawable sources registered by higher layers:
//! - `Backend` / `SurfaceFactory`: the present/blend/resize primitives a
//!   graphics API must provide
//! - `Drawable` / `UpdateLogic`: the per-frame capabilities of collaborators
//! - `RenderCoordinator`: update, opaque pass, translucent pass, present

mod app;
mod backend;
mod coordinator;
mod ctx;
mod error;
mod pass;

pub use app::{AppControl, UpdateLogic};
pub use backend::{Backend, BlendMode, SurfaceFactory};
pub use coordinator::{FrameReport, RenderCoordinator};
pub use ctx::{DrawCtx, UpdateCtx};
pub use error::{CoordinatorError, FrameError, SurfaceCreationError};
pub use pass::{DrawFailure, Drawable, PassKind, ScenePass};
