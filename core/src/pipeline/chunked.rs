//! pipeline/chunked.rs
//!
//! Chunk-parallel forward and inverse transforms.
//!
//! Layout per run:
//! - dispatcher thread: slices the input and sends `(chunk_index, slice)`
//! - N workers: run the sequential transform on their slice, counting into
//!   their own `TelemetryCounters`
//! - calling thread: commits results in chunk order, then merges the
//!   workers' counters
//!
//! Errors are reported for the earliest failing chunk: chunks are consumed
//! strictly in order, so every chunk before the failing one has already
//! succeeded when the error is returned. Cancellation is checked before each
//! commit, so a cancelled run has committed exactly `chunks_done` chunks.

use std::collections::BTreeMap;
use std::panic;
use std::thread;

use crossbeam::channel::bounded;

use crate::cdp::{self, DerivedStreams, TransformError};
use crate::pipeline::parallelism::{CancellationToken, ParallelismProfile};
use crate::pipeline::types::PipelineError;
use crate::resonance::ResonanceMap;
use crate::telemetry::TelemetryCounters;

/// Forward transform across `profile.worker_count` threads.
pub fn run_forward_parallel(
    bytes: &[u8],
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
) -> Result<DerivedStreams, PipelineError> {
    forward_counted(bytes, map, profile, cancel).map(|(streams, _)| streams)
}

/// Inverse transform across `profile.worker_count` threads.
pub fn run_inverse_parallel(
    streams: &DerivedStreams,
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, PipelineError> {
    inverse_counted(&streams.class_stream, &streams.index_stream, map, profile, cancel)
        .map(|(bytes, _)| bytes)
}

fn zero_count(index_stream: &[u8]) -> usize {
    index_stream.iter().filter(|&&i| i == 0).count()
}

fn cancelled(chunks_done: u64) -> PipelineError {
    log::debug!("[COLLECT] cancelled after {} chunks", chunks_done);
    PipelineError::Cancelled { chunks_done }
}

pub(crate) fn forward_counted(
    bytes: &[u8],
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
) -> Result<(DerivedStreams, TelemetryCounters), PipelineError> {
    forward_observed(bytes, map, profile, cancel, |_| {})
}

pub(crate) fn inverse_counted(
    class_stream: &[u8],
    index_stream: &[u8],
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
) -> Result<(Vec<u8>, TelemetryCounters), PipelineError> {
    inverse_observed(class_stream, index_stream, map, profile, cancel, |_| {})
}

/// `on_commit` sees the number of chunks committed so far, after each commit.
fn forward_observed(
    bytes: &[u8],
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
    mut on_commit: impl FnMut(u64),
) -> Result<(DerivedStreams, TelemetryCounters), PipelineError> {
    profile.validate()?;
    let chunk_size = profile.chunk_size;
    let mut counters = TelemetryCounters::default();
    let mut out = DerivedStreams::with_capacity(bytes.len());

    if profile.worker_count == 1 {
        for chunk in bytes.chunks(chunk_size) {
            if cancel.is_cancelled() {
                return Err(cancelled(counters.chunks));
            }
            let start = out.len();
            cdp::forward_into(chunk, map, &mut out.class_stream, &mut out.index_stream);
            counters.add_forward(chunk.len(), zero_count(&out.index_stream[start..]));
            on_commit(counters.chunks);
        }
        return Ok((out, counters));
    }

    thread::scope(|scope| {
        let (job_tx, job_rx) = bounded::<(u64, &[u8])>(profile.inflight_chunks);
        let (done_tx, done_rx) = bounded::<(u64, DerivedStreams)>(profile.inflight_chunks);

        scope.spawn(move || {
            for (index, chunk) in bytes.chunks(chunk_size).enumerate() {
                if cancel.is_cancelled() {
                    log::debug!("[DISPATCH] cancelled before chunk {}", index);
                    break;
                }
                if job_tx.send((index as u64, chunk)).is_err() {
                    break;
                }
            }
        });

        let workers: Vec<_> = (0..profile.worker_count)
            .map(|id| {
                let rx = job_rx.clone();
                let tx = done_tx.clone();
                scope.spawn(move || {
                    log::trace!("[WORKER-{id}] forward starting");
                    let mut local = TelemetryCounters::default();
                    for (index, chunk) in rx.iter() {
                        let streams = cdp::forward(chunk, map);
                        local.add_forward(streams.len(), zero_count(&streams.index_stream));
                        if tx.send((index, streams)).is_err() {
                            break;
                        }
                    }
                    log::trace!("[WORKER-{id}] forward finished after {} chunks", local.chunks);
                    local
                })
            })
            .collect();
        drop(job_rx);
        drop(done_tx);

        let mut next = 0u64;
        let mut pending = BTreeMap::new();
        for (index, streams) in done_rx.iter() {
            pending.insert(index, streams);
            while let Some(mut ready) = pending.remove(&next) {
                if cancel.is_cancelled() {
                    return Err(cancelled(next));
                }
                out.append(&mut ready);
                next += 1;
                on_commit(next);
            }
        }
        if cancel.is_cancelled() {
            return Err(cancelled(next));
        }

        for worker in workers {
            counters += worker.join().unwrap_or_else(|p| panic::resume_unwind(p));
        }
        Ok(())
    })?;

    Ok((out, counters))
}

fn inverse_observed(
    class_stream: &[u8],
    index_stream: &[u8],
    map: &ResonanceMap,
    profile: &ParallelismProfile,
    cancel: &CancellationToken,
    mut on_commit: impl FnMut(u64),
) -> Result<(Vec<u8>, TelemetryCounters), PipelineError> {
    profile.validate()?;
    if class_stream.len() != index_stream.len() {
        return Err(TransformError::LengthMismatch {
            class_len: class_stream.len(),
            index_len: index_stream.len(),
        }
        .into());
    }

    let chunk_size = profile.chunk_size;
    let mut counters = TelemetryCounters::default();
    let mut out = Vec::with_capacity(class_stream.len());

    if profile.worker_count == 1 {
        let pairs = class_stream.chunks(chunk_size).zip(index_stream.chunks(chunk_size));
        for (index, (classes, indices)) in pairs.enumerate() {
            if cancel.is_cancelled() {
                return Err(cancelled(counters.chunks));
            }
            cdp::inverse_into(classes, indices, map, &mut out)
                .map_err(|e| e.offset_by(index * chunk_size))?;
            counters.add_inverse(classes.len());
            on_commit(counters.chunks);
        }
        return Ok((out, counters));
    }

    thread::scope(|scope| {
        let (job_tx, job_rx) = bounded::<(u64, &[u8], &[u8])>(profile.inflight_chunks);
        let (done_tx, done_rx) =
            bounded::<(u64, Result<Vec<u8>, TransformError>)>(profile.inflight_chunks);

        scope.spawn(move || {
            let pairs = class_stream.chunks(chunk_size).zip(index_stream.chunks(chunk_size));
            for (index, (classes, indices)) in pairs.enumerate() {
                if cancel.is_cancelled() {
                    log::debug!("[DISPATCH] cancelled before chunk {}", index);
                    break;
                }
                if job_tx.send((index as u64, classes, indices)).is_err() {
                    break;
                }
            }
        });

        let workers: Vec<_> = (0..profile.worker_count)
            .map(|id| {
                let rx = job_rx.clone();
                let tx = done_tx.clone();
                scope.spawn(move || {
                    log::trace!("[WORKER-{id}] inverse starting");
                    let mut local = TelemetryCounters::default();
                    for (index, classes, indices) in rx.iter() {
                        let res = cdp::inverse(classes, indices, map)
                            .map_err(|e| e.offset_by(index as usize * chunk_size));
                        if let Ok(bytes) = &res {
                            local.add_inverse(bytes.len());
                        }
                        if tx.send((index, res)).is_err() {
                            break;
                        }
                    }
                    log::trace!("[WORKER-{id}] inverse finished after {} chunks", local.chunks);
                    local
                })
            })
            .collect();
        drop(job_rx);
        drop(done_tx);

        let mut next = 0u64;
        let mut pending = BTreeMap::new();
        for (index, res) in done_rx.iter() {
            pending.insert(index, res);
            while let Some(ready) = pending.remove(&next) {
                if cancel.is_cancelled() {
                    return Err(cancelled(next));
                }
                // Returning drops `done_rx`, which stops the workers.
                let bytes = ready?;
                out.extend_from_slice(&bytes);
                next += 1;
                on_commit(next);
            }
        }
        if cancel.is_cancelled() {
            return Err(cancelled(next));
        }

        for worker in workers {
            counters += worker.join().unwrap_or_else(|p| panic::resume_unwind(p));
        }
        Ok(())
    })?;

    Ok((out, counters))
}
