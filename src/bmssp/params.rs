//! Recursion parameters `k` and `t` and the sizes derived from them.

use serde::Serialize;

use crate::error::{Result, SsspError};

/// Overrides `k` when set to a positive integer.
pub const ENV_K: &str = "SSSP_BMSSP_K";
/// Overrides `t` when set to a positive integer.
pub const ENV_T: &str = "SSSP_BMSSP_T";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Params {
    /// Relaxation rounds in pivot search and vertices settled per base case.
    pub k: usize,
    /// Each level shrinks the problem by a factor of `2^t`.
    pub t: usize,
}

impl Params {
    pub fn new(k: usize, t: usize) -> Result<Self> {
        if k == 0 {
            return Err(SsspError::InvalidParameter { name: "k", value: k.to_string() });
        }
        if t == 0 {
            return Err(SsspError::InvalidParameter { name: "t", value: t.to_string() });
        }
        Ok(Self { k, t })
    }

    /// `k = floor(log2(n)^(1/3))`, `t = floor(log2(n)^(2/3))`, both at
    /// least 1.
    pub fn derive(n: usize) -> Self {
        let lg = log2(n);
        let k = (lg.powf(1.0 / 3.0).floor() as usize).max(1);
        let t = (lg.powf(2.0 / 3.0).floor() as usize).max(1);
        Self { k, t }
    }

    /// [`Params::derive`] overridden by [`ENV_K`] / [`ENV_T`].
    pub fn from_env(n: usize) -> Result<Self> {
        Self::from_lookup(n, |name| std::env::var(name).ok())
    }

    /// Like [`Params::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(n: usize, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let derived = Self::derive(n);
        let k = parse_override(ENV_K, "k", lookup(ENV_K))?.unwrap_or(derived.k);
        let t = parse_override(ENV_T, "t", lookup(ENV_T))?.unwrap_or(derived.t);
        Self::new(k, t)
    }

    /// Depth of the outermost call: `ceil(log2(n) / t)`.
    pub fn top_level(&self, n: usize) -> usize {
        (log2(n) / self.t as f64).ceil() as usize
    }

    /// Block capacity `M = 2^((level - 1) t)` of a frontier at `level >= 1`.
    pub fn block_capacity(&self, level: usize) -> usize {
        pow2(level.saturating_sub(1).saturating_mul(self.t))
    }

    /// Output cap `2^(level t)` of a call at `level`.
    pub fn level_capacity(&self, level: usize) -> usize {
        pow2(level.saturating_mul(self.t))
    }
}

fn log2(n: usize) -> f64 {
    (n.max(1) as f64).log2()
}

fn pow2(exp: usize) -> usize {
    u32::try_from(exp)
        .ok()
        .and_then(|e| 1usize.checked_shl(e))
        .unwrap_or(usize::MAX)
}

fn parse_override(
    var: &'static str,
    name: &'static str,
    raw: Option<String>,
) -> Result<Option<usize>> {
    let Some(raw) = raw else { return Ok(None) };
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(Some(v)),
        _ => Err(SsspError::InvalidParameter { name, value: format!("{var}={raw}") }),
    }
}
