//! Minimal terminal runtime: an [`App`] driven by tick, render and input events.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
