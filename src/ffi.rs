//! Stable C ABI over the two solvers.
//!
//! Graphs arrive as `u32` CSR arrays with `f64` weights and are validated
//! before either solver runs. Every entry point returns `0` on success or
//! one of the negative codes below, mirrored in `SsspResultInfo::error_code`.

use std::os::raw::c_char;
use std::slice;

use crate::bmssp::Bmssp;
use crate::dijkstra::dijkstra;
use crate::error::SsspError;
use crate::graph::{Graph, VertexId};

pub const SSSP_OK: i32 = 0;
pub const SSSP_ERR_EMPTY_GRAPH: i32 = -1;
pub const SSSP_ERR_SOURCE_OUT_OF_RANGE: i32 = -2;
pub const SSSP_ERR_NULL_POINTER: i32 = -3;
pub const SSSP_ERR_INVALID_CSR: i32 = -4;
/// `SSSP_BMSSP_K` / `SSSP_BMSSP_T` held something other than a positive
/// integer.
pub const SSSP_ERR_INVALID_PARAMETER: i32 = -5;
/// A predecessor id does not fit the `i32` output array.
pub const SSSP_ERR_PREDECESSOR_OVERFLOW: i32 = -6;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SsspResultInfo {
    pub relaxations: u64,
    pub settled: u64,
    /// BMSSP only; zero for the baseline.
    pub pulls: u64,
    /// BMSSP only; zero for the baseline.
    pub base_cases: u64,
    pub error_code: i32,
}

impl SsspResultInfo {
    fn failed(code: i32) -> Self {
        Self { error_code: code, ..Self::default() }
    }
}

fn error_code(err: &SsspError) -> i32 {
    match err {
        SsspError::EmptyGraph => SSSP_ERR_EMPTY_GRAPH,
        SsspError::SourceOutOfRange { .. } => SSSP_ERR_SOURCE_OUT_OF_RANGE,
        SsspError::InvalidParameter { .. } => SSSP_ERR_INVALID_PARAMETER,
        _ => SSSP_ERR_INVALID_CSR,
    }
}

/// Write predecessors as `i32`, `-1` for none. Fails without touching
/// `out` when some id does not fit.
fn encode_predecessors(predecessor: &[Option<VertexId>], out: &mut [i32]) -> Result<(), i32> {
    let encoded = predecessor
        .iter()
        .map(|p| match p {
            None => Ok(-1),
            Some(v) => i32::try_from(*v).map_err(|_| SSSP_ERR_PREDECESSOR_OVERFLOW),
        })
        .collect::<Result<Vec<i32>, i32>>()?;
    out.copy_from_slice(&encoded);
    Ok(())
}

unsafe fn write_info(info: *mut SsspResultInfo, value: SsspResultInfo) {
    if !info.is_null() {
        *info = value;
    }
}

/// Borrow the CSR arrays and validate them into a [`Graph`].
///
/// # Safety
/// Non-null pointers must be valid for `n + 1` offsets and `offsets[n]`
/// targets and weights.
unsafe fn load_graph(
    n: u32,
    offsets: *const u32,
    targets: *const u32,
    weights: *const f64,
    source: u32,
) -> Result<Graph, i32> {
    if n == 0 {
        return Err(SSSP_ERR_EMPTY_GRAPH);
    }
    if source >= n {
        return Err(SSSP_ERR_SOURCE_OUT_OF_RANGE);
    }
    if offsets.is_null() || targets.is_null() || weights.is_null() {
        return Err(SSSP_ERR_NULL_POINTER);
    }
    let off = slice::from_raw_parts(offsets, n as usize + 1);
    let m = off[n as usize] as usize;
    let tgt = slice::from_raw_parts(targets, m);
    let wts = slice::from_raw_parts(weights, m);
    Graph::from_csr_u32(off, tgt, wts).map_err(|_| SSSP_ERR_INVALID_CSR)
}

/// Dijkstra baseline. Unreachable vertices get `+inf` and predecessor `-1`.
///
/// # Safety
/// `offsets` must hold `n + 1` entries, `targets` and `weights` must hold
/// `offsets[n]` entries, `out_dist` and `out_pred` must be writable for `n`
/// entries. `info` may be null.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn sssp_run_baseline(
    n: u32,
    offsets: *const u32,
    targets: *const u32,
    weights: *const f64,
    source: u32,
    out_dist: *mut f64,
    out_pred: *mut i32,
    info: *mut SsspResultInfo,
) -> i32 {
    if out_dist.is_null() || out_pred.is_null() {
        write_info(info, SsspResultInfo::failed(SSSP_ERR_NULL_POINTER));
        return SSSP_ERR_NULL_POINTER;
    }
    let graph = match load_graph(n, offsets, targets, weights, source) {
        Ok(g) => g,
        Err(code) => {
            write_info(info, SsspResultInfo::failed(code));
            return code;
        }
    };
    let sp = match dijkstra(&graph, source as usize) {
        Ok(sp) => sp,
        Err(err) => {
            let code = error_code(&err);
            write_info(info, SsspResultInfo::failed(code));
            return code;
        }
    };

    let pred = slice::from_raw_parts_mut(out_pred, n as usize);
    if let Err(code) = encode_predecessors(&sp.predecessor, pred) {
        write_info(info, SsspResultInfo::failed(code));
        return code;
    }
    slice::from_raw_parts_mut(out_dist, n as usize).copy_from_slice(&sp.distance);
    write_info(
        info,
        SsspResultInfo {
            relaxations: sp.stats.relaxations,
            settled: sp.stats.settled,
            ..SsspResultInfo::default()
        },
    );
    SSSP_OK
}

/// BMSSP with `k` and `t` derived from `n`, overridable through
/// `SSSP_BMSSP_K` / `SSSP_BMSSP_T`.
///
/// # Safety
/// Same contract as [`sssp_run_baseline`] minus the predecessor array.
#[no_mangle]
pub unsafe extern "C" fn sssp_run_bmssp(
    n: u32,
    offsets: *const u32,
    targets: *const u32,
    weights: *const f64,
    source: u32,
    out_dist: *mut f64,
    info: *mut SsspResultInfo,
) -> i32 {
    if out_dist.is_null() {
        write_info(info, SsspResultInfo::failed(SSSP_ERR_NULL_POINTER));
        return SSSP_ERR_NULL_POINTER;
    }
    let graph = match load_graph(n, offsets, targets, weights, source) {
        Ok(g) => g,
        Err(code) => {
            write_info(info, SsspResultInfo::failed(code));
            return code;
        }
    };
    let mut solver = match Bmssp::from_env(&graph, source as usize) {
        Ok(s) => s,
        Err(err) => {
            let code = error_code(&err);
            write_info(info, SsspResultInfo::failed(code));
            return code;
        }
    };
    let (distance, stats) = solver.run_with_stats();

    slice::from_raw_parts_mut(out_dist, n as usize).copy_from_slice(&distance);
    write_info(
        info,
        SsspResultInfo {
            relaxations: stats.relaxations,
            settled: stats.settled,
            pulls: stats.pulls,
            base_cases: stats.base_cases,
            error_code: SSSP_OK,
        },
    );
    SSSP_OK
}

/// NUL-terminated crate version.
#[no_mangle]
pub extern "C" fn sssp_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}
