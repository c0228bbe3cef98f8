//! Synthetic spiking waveform for frontend prototyping.

use std::f64::consts::PI;

use neurotrace_types::{Trace, TraceError};

use crate::error::{Error, Result};

/// Upper bound on generated samples (about 160 MB of times and values).
pub const MAX_GENERATED_SAMPLES: usize = 10_000_000;

/// Parameters of a synthetic spike train.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTrainParams {
    /// Recording length in seconds.
    pub duration: f64,
    /// Sample interval in seconds.
    pub dt: f64,
    /// Resting potential in mV.
    pub baseline_mv: f64,
    /// Peak height above baseline in mV.
    pub amplitude_mv: f64,
    /// Width of one spike in milliseconds.
    pub spike_width_ms: f64,
    /// Spike onsets in seconds.
    pub spike_times: Vec<f64>,
}

impl Default for SpikeTrainParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            dt: 0.0005,
            baseline_mv: -65.0,
            amplitude_mv: 95.0,
            spike_width_ms: 2.0,
            spike_times: vec![0.08, 0.18, 0.345, 0.52, 0.73, 0.86],
        }
    }
}

impl SpikeTrainParams {
    /// Number of samples in the generated trace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeAxis`] if the recording would hold no
    /// sample or more than [`MAX_GENERATED_SAMPLES`].
    pub fn sample_count(&self) -> Result<usize> {
        // tolerate representation error in duration / dt (e.g. 0.01 / 0.0005)
        let count = (self.duration / self.dt + 1e-9).floor();
        if count < 1.0 {
            return Err(Error::InvalidTimeAxis(format!(
                "duration {} s is shorter than one sample of {} s",
                self.duration, self.dt
            )));
        }
        if count > MAX_GENERATED_SAMPLES as f64 {
            return Err(Error::InvalidTimeAxis(format!(
                "duration {} s at dt {} s needs {:e} samples (limit {})",
                self.duration, self.dt, count, MAX_GENERATED_SAMPLES
            )));
        }
        Ok(count as usize)
    }
}

/// Generate a trace resting at the baseline with half-sine spikes.
///
/// A spike that would run past the end of the recording is left out.
///
/// # Errors
///
/// Returns an error if `dt` or `duration` is not positive and finite, or if
/// they call for no sample or more than [`MAX_GENERATED_SAMPLES`].
pub fn generate_spike_train(params: &SpikeTrainParams) -> Result<Trace> {
    if !(params.dt.is_finite() && params.dt > 0.0) {
        return Err(TraceError::InvalidInterval(params.dt).into());
    }
    if !(params.duration.is_finite() && params.duration > 0.0) {
        return Err(Error::InvalidTimeAxis(format!(
            "duration {} must be positive",
            params.duration
        )));
    }

    let n = params.sample_count()?;
    let times: Vec<f64> = (0..n)
        .map(|i| params.duration * i as f64 / n as f64)
        .collect();
    let mut values = vec![params.baseline_mv; n];

    let width = (params.spike_width_ms / 1000.0 / params.dt) as usize;
    for &onset in &params.spike_times {
        let start = (onset / params.dt) as usize;
        if width == 0 || start.checked_add(width).is_none_or(|end| end >= n) {
            continue;
        }
        for (j, v) in values[start..start + width].iter_mut().enumerate() {
            let phase = if width > 1 {
                PI * j as f64 / (width - 1) as f64
            } else {
                0.0
            };
            *v = params.baseline_mv + params.amplitude_mv * phase.sin();
        }
    }

    Ok(Trace::with_times(times, values)?)
}
