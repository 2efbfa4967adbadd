//! Interview scheduling: a week of bookable appointment slots, each driven by
//! its own mode stack, kept in step with a remote store through optimistic
//! save and delete calls.

pub mod application;
pub mod appointment;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod parser;
pub mod remote;
pub mod schedule;
pub mod visual_mode;
pub mod web;
