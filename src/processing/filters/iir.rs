// src/processing/filters/iir.rs
//! IIR (Infinite Impulse Response) digital filters

use super::FilterError;
use std::f64::consts::PI;

/// One second-order section, normalised so that a0 = 1
///
/// First-order sections are stored with `b2 = a2 = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    /// First-order Butterworth low-pass via the bilinear transform
    fn first_order_lowpass(cutoff: f64, sample_rate: f64) -> Self {
        let k = (PI * cutoff / sample_rate).tan();
        let norm = 1.0 + k;
        Self {
            b0: k / norm,
            b1: k / norm,
            b2: 0.0,
            a1: (k - 1.0) / norm,
            a2: 0.0,
        }
    }

    /// Second-order low-pass with quality factor `q`
    fn second_order_lowpass(cutoff: f64, sample_rate: f64, q: f64) -> Self {
        let omega = 2.0 * PI * cutoff / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: (1.0 - cos_omega) / 2.0 / a0,
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Gain at 0 Hz
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    /// Transposed direct form II state for a constant unit input
    fn steady_state(&self) -> (f64, f64) {
        let s2 = self.b2 - self.a2;
        let s1 = self.b1 - self.a1 + s2;
        (s1, s2)
    }
}

/// Cascade of sections forming one IIR filter
#[derive(Debug, Clone)]
pub struct IirFilter {
    sections: Vec<Biquad>,
    order: usize,
    cutoff: f64,
}

impl IirFilter {
    /// Create a Butterworth low-pass filter of the given order (1-8)
    pub fn butterworth_lowpass(order: usize, cutoff: f64, sample_rate: f64) -> Result<Self, FilterError> {
        if order == 0 || order > 8 {
            return Err(FilterError::InvalidParameters(format!("Order must be 1-8, got {}", order)));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FilterError::InvalidParameters(format!("Invalid sample rate: {} Hz", sample_rate)));
        }
        if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= sample_rate / 2.0 {
            return Err(FilterError::InvalidParameters(format!(
                "Invalid cutoff frequency: {} Hz (sample rate: {} Hz)",
                cutoff, sample_rate
            )));
        }

        let mut sections = Vec::with_capacity(order.div_ceil(2));
        for k in 0..order / 2 {
            // Pole angle measured from the negative real axis
            let psi = if order % 2 == 0 {
                PI * (2 * k + 1) as f64 / (2 * order) as f64
            } else {
                PI * (k + 1) as f64 / order as f64
            };
            let q = 1.0 / (2.0 * psi.cos());
            sections.push(Biquad::second_order_lowpass(cutoff, sample_rate, q));
        }
        if order % 2 == 1 {
            sections.push(Biquad::first_order_lowpass(cutoff, sample_rate));
        }

        Ok(Self { sections, order, cutoff })
    }

    /// Get filter order
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Samples of odd-reflection padding added at each edge by [`filtfilt`](Self::filtfilt)
    pub fn pad_length(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Causal filtering starting from rest
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        self.run(input, None)
    }

    /// Zero-phase filtering: forward pass, then backward pass
    ///
    /// The signal is extended at both ends by odd reflection and each pass
    /// starts from the steady state of its first sample, which suppresses the
    /// start-up transient.
    pub fn filtfilt(&self, input: &[f64]) -> Result<Vec<f64>, FilterError> {
        let pad = self.pad_length();
        if input.len() <= pad {
            return Err(FilterError::SignalTooShort {
                required: pad + 1,
                actual: input.len(),
            });
        }

        let n = input.len();
        let first = input[0];
        let last = input[n - 1];

        let mut extended = Vec::with_capacity(n + 2 * pad);
        extended.extend((1..=pad).rev().map(|i| 2.0 * first - input[i]));
        extended.extend_from_slice(input);
        extended.extend((1..=pad).map(|i| 2.0 * last - input[n - 1 - i]));

        let forward = self.run(&extended, Some(extended[0]));
        let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
        let start = reversed[0];
        reversed = self.run(&reversed, Some(start));
        reversed.reverse();

        Ok(reversed[pad..pad + n].to_vec())
    }

    fn run(&self, input: &[f64], initial: Option<f64>) -> Vec<f64> {
        let mut states: Vec<(f64, f64)> = self
            .sections
            .iter()
            .map(|section| match initial {
                Some(x0) => {
                    let (s1, s2) = section.steady_state();
                    (s1 * x0, s2 * x0)
                }
                None => (0.0, 0.0),
            })
            .collect();

        input
            .iter()
            .map(|&x| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(x, |sample, (section, (s1, s2))| {
                        let y = section.b0 * sample + *s1;
                        *s1 = section.b1 * sample - section.a1 * y + *s2;
                        *s2 = section.b2 * sample - section.a2 * y;
                        y
                    })
            })
            .collect()
    }
}
