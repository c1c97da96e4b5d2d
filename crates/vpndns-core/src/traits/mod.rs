//! Trait definitions for external collaborators

pub mod dispatcher;

pub use dispatcher::UpdateDispatcher;
