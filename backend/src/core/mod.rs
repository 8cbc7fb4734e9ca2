//! Core primitives shared by the trial engine and the experiment runner

pub mod time;
