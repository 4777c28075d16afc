// src/acquisition/sample_buffer.rs
//! Fixed-capacity shift-register buffer for one sensor channel

use std::collections::VecDeque;

/// Holds the most recent `capacity` raw samples of one channel
///
/// Pushing a window of M samples evicts the M oldest samples once the buffer
/// is full. A window longer than the capacity keeps only its own newest
/// `capacity` samples.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create an empty buffer
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a window, returning how many of its samples were admitted
    ///
    /// Returns 0 when the window is empty or the buffer has no capacity, in
    /// which case the buffer is unchanged.
    pub fn push(&mut self, window: &[f64]) -> usize {
        if window.is_empty() || self.capacity == 0 {
            return 0;
        }

        if window.len() >= self.capacity {
            let tail = &window[window.len() - self.capacity..];
            self.samples.clear();
            self.samples.extend(tail.iter().copied());
            return self.capacity;
        }

        let overflow = (self.samples.len() + window.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(window.iter().copied());
        window.len()
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Iterate over the current contents, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Approximate memory held by the sample storage
    pub fn memory_usage_bytes(&self) -> usize {
        self.capacity * std::mem::size_of::<f64>()
    }

    /// Drop all samples, keeping the capacity
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
