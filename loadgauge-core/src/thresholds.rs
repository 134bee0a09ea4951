use std::fmt;

use crate::error::{Error, Result};

/// Snapshot metric a threshold is evaluated against. Latencies are in
/// milliseconds, throughput in invocations per second, error rate in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMetric {
    ErrorRate,
    Throughput,
    MeanLatency,
    MinLatency,
    MaxLatency,
    Percentile(u8),
}

impl fmt::Display for ThresholdMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMetric::ErrorRate => f.write_str("error_rate"),
            ThresholdMetric::Throughput => f.write_str("throughput"),
            ThresholdMetric::MeanLatency => f.write_str("mean"),
            ThresholdMetric::MinLatency => f.write_str("min"),
            ThresholdMetric::MaxLatency => f.write_str("max"),
            ThresholdMetric::Percentile(p) => write!(f, "p({p})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ThresholdOp {
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "==")]
    Eq,
}

/// One validation requirement: `metric op value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub metric: ThresholdMetric,
    pub op: ThresholdOp,
    pub value: f64,
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.metric, self.op, self.value)
    }
}

/// A threshold the final snapshot did not satisfy. `observed` is `None` when
/// the metric could not be computed from the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdViolation {
    pub threshold: Threshold,
    pub observed: Option<f64>,
}

/// Parses a compact threshold expression such as `"p(99) <= 250"`,
/// `"error_rate<0.05"`, `"throughput>=1000"`, `"mean<200"` or `"max<1500"`.
/// Whitespace is ignored.
pub fn parse_threshold(raw: &str) -> Result<Threshold> {
    let s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Err(Error::InvalidThreshold("empty threshold".to_string()));
    }

    // Find operator
    let ops = [
        ("<=", ThresholdOp::Lte),
        (">=", ThresholdOp::Gte),
        ("==", ThresholdOp::Eq),
        ("<", ThresholdOp::Lt),
        (">", ThresholdOp::Gt),
    ];
    let (op_pos, op_len, op) = ops
        .iter()
        .find_map(|(tok, op)| s.find(tok).map(|pos| (pos, tok.len(), *op)))
        .ok_or_else(|| Error::InvalidThreshold(format!("missing operator: {raw}")))?;

    let (left, right_with_op) = s.split_at(op_pos);
    let right = &right_with_op[op_len..];
    if left.is_empty() || right.is_empty() {
        return Err(Error::InvalidThreshold(raw.to_string()));
    }

    let metric = if left.eq_ignore_ascii_case("error_rate") {
        ThresholdMetric::ErrorRate
    } else if left.eq_ignore_ascii_case("throughput") {
        ThresholdMetric::Throughput
    } else if left.eq_ignore_ascii_case("mean") {
        ThresholdMetric::MeanLatency
    } else if left.eq_ignore_ascii_case("min") {
        ThresholdMetric::MinLatency
    } else if left.eq_ignore_ascii_case("max") {
        ThresholdMetric::MaxLatency
    } else if let Some(inner) = left.strip_prefix("p(").and_then(|v| v.strip_suffix(')')) {
        let p: u8 = inner
            .parse()
            .map_err(|_| Error::InvalidThreshold(format!("invalid percentile: {raw}")))?;
        if !(1..=99).contains(&p) {
            return Err(Error::InvalidThreshold(format!(
                "percentile out of range: {raw}"
            )));
        }
        ThresholdMetric::Percentile(p)
    } else {
        return Err(Error::InvalidThreshold(format!(
            "unknown metric `{left}`: {raw}"
        )));
    };

    let value: f64 = right
        .parse()
        .map_err(|_| Error::InvalidThreshold(format!("invalid numeric value: {raw}")))?;

    Ok(Threshold { metric, op, value })
}
