//! `hnr`: a terminal reader for Hacker News.
//!
//! The heart of the crate is [`thread`]: a comment forest is flattened once
//! into pre-order rows, and per-row collapse flags are projected into
//! visibility on every toggle. [`hn`] fetches stories from the live API or
//! from offline snapshots; [`ui`] draws them with ratatui.

pub mod app;
pub mod config;
pub mod dump;
pub mod hn;
pub mod html;
pub mod theme;
pub mod thread;
pub mod ui;
pub mod util;
