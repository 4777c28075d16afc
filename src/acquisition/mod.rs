// src/acquisition/mod.rs
//! Sample acquisition and buffering

pub mod sample_buffer;

pub use sample_buffer::SampleBuffer;
