use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// `--weight key=value` override applied to a recommended feature.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WeightOverride {
    pub(crate) key: String,
    pub(crate) weight: f64,
}

pub(crate) fn parse_weight(raw: &str) -> Result<WeightOverride, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=WEIGHT, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing feature key in '{raw}'"));
    }
    let weight = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid weight in '{raw}' ({err})"))?;
    Ok(WeightOverride {
        key: key.to_string(),
        weight,
    })
}
