//! Rolling-spectrum oscillation analysis.
//!
//! Each tracked signal keeps a bounded rolling buffer of scalar
//! summaries (typically a layer's mean activation per tick). Spectral
//! metrics are estimated over the buffer with a Hann-windowed FFT; the
//! DC bin is excluded so the dominant frequency reflects the rhythm,
//! not the operating point.

use crate::error::{AnalysisError, Result};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::PI;

/// Minimum buffered samples for a meaningful spectrum.
const MIN_SAMPLES: usize = 16;

/// Gamma band bounds (Hz).
const GAMMA_LOW: f64 = 30.0;
const GAMMA_HIGH: f64 = 80.0;

/// Spectral summary of a tracked signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OscillationMetrics {
    /// Frequency of the strongest non-DC spectral peak (Hz).
    pub dominant_frequency: f64,
    /// Phase of the dominant component, in [-pi, pi].
    pub phase: f64,
    /// Amplitude of the dominant component in signal units.
    pub amplitude: f64,
    /// Simulation time of the newest sample (s).
    pub timestamp: f64,
    /// Whether the dominant frequency falls in the 30-80 Hz gamma band.
    pub is_gamma: bool,
}

/// Rolling buffer with on-demand spectral estimation.
pub struct OscillationAnalyzer {
    sample_rate: f64,
    history_size: usize,
    buffer: VecDeque<f64>,
    samples_seen: u64,
    planner: FftPlanner<f64>,
}

impl OscillationAnalyzer {
    /// Create an analyzer sampling at `sample_rate` Hz with a rolling
    /// window of `history_size` samples.
    pub fn new(sample_rate: f64, history_size: usize) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidParameter {
                parameter: "sample_rate".to_string(),
                value: sample_rate,
                reason: "must be positive and finite".to_string(),
            });
        }
        if history_size < MIN_SAMPLES {
            return Err(AnalysisError::InvalidParameter {
                parameter: "history_size".to_string(),
                value: history_size as f64,
                reason: format!("must be at least {MIN_SAMPLES}"),
            });
        }
        Ok(Self {
            sample_rate,
            history_size,
            buffer: VecDeque::with_capacity(history_size),
            samples_seen: 0,
            planner: FftPlanner::new(),
        })
    }

    /// Configured sample rate (Hz).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Configured window length.
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append one sample, evicting the oldest at capacity.
    pub fn push(&mut self, sample: f64) {
        if self.buffer.len() == self.history_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
        self.samples_seen += 1;
    }

    /// Estimate the dominant rhythm over the current buffer.
    pub fn metrics(&mut self) -> Result<OscillationMetrics> {
        let n = self.buffer.len();
        if n < MIN_SAMPLES {
            return Err(AnalysisError::InsufficientSamples {
                needed: MIN_SAMPLES,
                available: n,
            });
        }

        // Mean-removed, Hann-windowed copy of the buffer
        let mean: f64 = self.buffer.iter().sum::<f64>() / n as f64;
        let mut window_sum = 0.0;
        let mut spectrum: Vec<Complex<f64>> = self
            .buffer
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let w = 0.5 * (1.0 - (2.0 * PI * i as f64 / (n - 1) as f64).cos());
                window_sum += w;
                Complex::new((x - mean) * w, 0.0)
            })
            .collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut spectrum);

        // Peak over the positive-frequency bins, DC excluded
        let half = n / 2;
        let (peak_bin, peak) = spectrum[1..=half]
            .iter()
            .enumerate()
            .map(|(i, c)| (i + 1, c))
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .expect("window length is at least MIN_SAMPLES");

        let dominant_frequency = peak_bin as f64 * self.sample_rate / n as f64;
        let amplitude = 2.0 * peak.norm() / window_sum.max(1e-12);
        let phase = peak.arg();

        Ok(OscillationMetrics {
            dominant_frequency,
            phase,
            amplitude,
            timestamp: self.samples_seen as f64 / self.sample_rate,
            is_gamma: (GAMMA_LOW..=GAMMA_HIGH).contains(&dominant_frequency),
        })
    }

    /// Drop all buffered samples.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.samples_seen = 0;
    }
}
