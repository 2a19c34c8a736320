//! Scenario suite for the hosted to-do list widget.
//!
//! Each scenario opens the widget on a fresh page, drives it through
//! [`page::TodoPage`] and asserts the observable state the behavior model
//! in `todo_model` predicts. [`runner::SuiteRunner`] runs the table and
//! collects a [`report::SuiteReport`].

#![allow(
    async_fn_in_trait,
    reason = "factories are only used through generics on a single task"
)]

pub mod config;
pub mod page;
pub mod report;
pub mod runner;
pub mod scenario;
