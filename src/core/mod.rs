//! # Core Application Logic
//!
//! This module contains Plif's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ViewState (app data) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Effect (requested IO)│
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  One-shot  │      │   tasks    │
//!     │  Adapter   │      │   (main)   │      │ (effects)  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the serializable `ViewState`
//! - [`action`]: The `Action` enum, `Effect` enum and `update()`
//! - [`payload`]: Builds what is sent to the model
//! - [`tasks`]: Runs an `Effect` and turns the outcome into an `Action`
//! - [`config`]: Settings with defaults → file → env → CLI resolution

pub mod action;
pub mod config;
pub mod payload;
pub mod state;
pub mod tasks;
