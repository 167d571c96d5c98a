use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::str::FromStr;
pub mod chart;
pub mod dir;
pub mod error;
pub mod logging;
pub mod plot;
pub mod report;

pub use error::{GvError, Result};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const CSV_DATA_FILE_NAME: &str = "data.csv";
pub const PLOT_HTML_FILE_NAME: &str = "plot.html";
/// token written by GasViewer for a missing value (JSON null)
pub const NULL_VALUE: &str = "null";

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 400;

#[derive(Debug, Deserialize)]
struct SampleRecord {
    #[serde(deserialize_with = "nullable")]
    unix_time: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    vg_m3: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    vm_m3: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    vb_m3: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pulses_reed_1: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pulses_reed_2: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    q_m3h: Option<f64>,
}

/// empty fields and the null token both map to None
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() || raw == NULL_VALUE {
        return Ok(None);
    }
    raw.parse::<T>().map(Some).map_err(serde::de::Error::custom)
}

/// The columns of the GasViewer sample file, in file order.
/// Missing volumes and flow rates are NAN, missing pulse counts are None.
#[derive(Debug, Clone, Default)]
pub struct RawSamples {
    pub unix_time: Vec<f64>,
    pub vg_m3: Vec<f64>,
    pub vm_m3: Vec<f64>,
    pub vb_m3: Vec<f64>,
    pub pulses_reed_1: Vec<Option<i64>>,
    pub pulses_reed_2: Vec<Option<i64>>,
    pub q_m3h: Vec<f64>,
}

impl RawSamples {
    pub fn new(capacity: usize) -> RawSamples {
        RawSamples {
            unix_time: Vec::with_capacity(capacity),
            vg_m3: Vec::with_capacity(capacity),
            vm_m3: Vec::with_capacity(capacity),
            vb_m3: Vec::with_capacity(capacity),
            pulses_reed_1: Vec::with_capacity(capacity),
            pulses_reed_2: Vec::with_capacity(capacity),
            q_m3h: Vec::with_capacity(capacity),
        }
    }

    /// Init the raw samples from the GasViewer csv.
    /// Columns are matched by header name; every value but the UNIX time may be missing.
    pub fn from_csv(fin: &Path) -> Result<RawSamples> {
        let csv_err = |source: csv::Error| GvError::Csv {
            path: fin.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(fin)
            .map_err(csv_err)?;
        let mut samples = RawSamples::new(1000);
        for (row, record) in reader.deserialize::<SampleRecord>().enumerate() {
            let record = record.map_err(csv_err)?;
            let unix_time = match record.unix_time {
                Some(t) if t.is_finite() => t,
                // header is line 1
                _ => return Err(GvError::InvalidUnixTime { line: row + 2 }),
            };
            samples.unix_time.push(unix_time);
            samples.vg_m3.push(record.vg_m3.unwrap_or(f64::NAN));
            samples.vm_m3.push(record.vm_m3.unwrap_or(f64::NAN));
            samples.vb_m3.push(record.vb_m3.unwrap_or(f64::NAN));
            samples.pulses_reed_1.push(record.pulses_reed_1);
            samples.pulses_reed_2.push(record.pulses_reed_2);
            samples.q_m3h.push(record.q_m3h.unwrap_or(f64::NAN));
        }
        tracing::debug!(path = %fin.display(), rows = samples.len(), "read sample file");
        Ok(samples)
    }

    pub fn len(&self) -> usize {
        self.unix_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unix_time.is_empty()
    }
}

/// Statistics of the sampling interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStats {
    pub dt_avg: f64,
    pub dt_std: f64,
    pub dt_std_over_avg: f64,
}

/// Checks that the UNIX times are unique and sorted,
/// then returns the statistics of the sampling interval (None for a single sample).
pub fn validate_unix_time(unix_times: &[f64]) -> Result<Option<TimeStats>> {
    let mut sorted = unix_times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(GvError::DuplicateUnixTime);
    }
    if unix_times.windows(2).any(|w| w[0] > w[1]) {
        return Err(GvError::UnsortedUnixTime);
    }
    let dt: Vec<f64> = unix_times.windows(2).map(|w| w[1] - w[0]).collect();
    if dt.is_empty() {
        tracing::warn!("single sample, no sampling interval statistics");
        return Ok(None);
    }
    let n = dt.len() as f64;
    let dt_avg = dt.iter().sum::<f64>() / n;
    // sample standard deviation, NAN with a single interval
    let dt_std = if dt.len() > 1 {
        (dt.iter().map(|d| (d - dt_avg).powi(2)).sum::<f64>() / (n - 1.)).sqrt()
    } else {
        f64::NAN
    };
    let stats = TimeStats {
        dt_avg,
        dt_std,
        dt_std_over_avg: dt_std / dt_avg,
    };
    tracing::info!(
        dt_avg = stats.dt_avg,
        dt_std = stats.dt_std,
        dt_std_over_avg = stats.dt_std_over_avg,
        "sampling interval"
    );
    Ok(Some(stats))
}

/// The derived time series that gets plotted, one entry per sample.
#[derive(Debug, Clone)]
pub struct GvSampling {
    pub sample_index: Vec<usize>,
    pub time_s: Vec<f64>,
    pub delta_time_s: Vec<f64>,
    pub vg_m3: Vec<f64>,
    pub vm_m3: Vec<f64>,
    pub vb_m3: Vec<f64>,
    pub delta_vg_m3: Vec<f64>,
    pub delta_vm_m3: Vec<f64>,
    pub delta_vb_m3: Vec<f64>,
    pub pulses_reed_1: Vec<Option<i64>>,
    pub pulses_reed_2: Vec<Option<i64>>,
    pub delta_pulses_reed_1: Vec<Option<i64>>,
    pub delta_pulses_reed_2: Vec<Option<i64>>,
    pub integral_q_m3: Vec<f64>,
    pub q_m3h: Vec<f64>,
}

impl GvSampling {
    /// validates the time axis and computes the relative time, the deltas and the integral flow
    pub fn from_raw(raw: RawSamples) -> Result<GvSampling> {
        if raw.is_empty() {
            return Err(GvError::EmptySampling);
        }
        validate_unix_time(&raw.unix_time)?;
        let t0 = match min_and_max(&raw.unix_time) {
            Some((min, _)) => min,
            None => return Err(GvError::EmptySampling),
        };
        let time_s: Vec<f64> = raw.unix_time.iter().map(|t| t - t0).collect();
        let delta_time_s = diff(&raw.unix_time);
        let flow_terms: Vec<f64> = raw
            .q_m3h
            .iter()
            .zip(delta_time_s.iter())
            .map(|(q, dt)| q / 3600. * dt)
            .collect();
        Ok(GvSampling {
            sample_index: (0..raw.len()).collect(),
            time_s,
            delta_time_s,
            delta_vg_m3: diff(&raw.vg_m3),
            delta_vm_m3: diff(&raw.vm_m3),
            delta_vb_m3: diff(&raw.vb_m3),
            delta_pulses_reed_1: diff_counts(&raw.pulses_reed_1),
            delta_pulses_reed_2: diff_counts(&raw.pulses_reed_2),
            integral_q_m3: cum_sum(&flow_terms),
            vg_m3: raw.vg_m3,
            vm_m3: raw.vm_m3,
            vb_m3: raw.vb_m3,
            pulses_reed_1: raw.pulses_reed_1,
            pulses_reed_2: raw.pulses_reed_2,
            q_m3h: raw.q_m3h,
        })
    }

    /// locates the sample file in the sampling directory and loads it
    pub fn from_dir(gv_sampling_dir_path: &Path) -> Result<GvSampling> {
        let fin = dir::data_file_path(gv_sampling_dir_path)?;
        GvSampling::from_raw(RawSamples::from_csv(&fin)?)
    }

    pub fn len(&self) -> usize {
        self.sample_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_index.is_empty()
    }
}

/// first difference, NAN for the first element
pub fn diff(v: &[f64]) -> Vec<f64> {
    std::iter::once(f64::NAN)
        .chain(v.windows(2).map(|w| w[1] - w[0]))
        .take(v.len())
        .collect()
}

/// first difference of counts, None for the first element and around missing counts
pub fn diff_counts(v: &[Option<i64>]) -> Vec<Option<i64>> {
    std::iter::once(None)
        .chain(v.windows(2).map(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => b.checked_sub(a),
            _ => None,
        }))
        .take(v.len())
        .collect()
}

/// running sum that skips NAN terms, leaving NAN at their position
pub fn cum_sum(v: &[f64]) -> Vec<f64> {
    let mut sum = 0.;
    v.iter()
        .map(|x| {
            if x.is_nan() {
                f64::NAN
            } else {
                sum += x;
                sum
            }
        })
        .collect()
}

/// min and max of the finite values, None if there are none
pub fn min_and_max(s: &[f64]) -> Option<(f64, f64)> {
    let mut self_iter = s.iter().filter(|v| v.is_finite());
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}
