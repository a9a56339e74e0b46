pub mod batch;
pub mod config;
pub mod input;
pub mod logging;
pub mod math;
pub mod output;
pub mod samples;
pub mod scoring;
