//! pipeline/io.rs
//!
//! Chunk-by-chunk streaming transforms over `Read`/`Write`.
//! Memory use is bounded by the chunk size regardless of input length.

use std::io::{self, Read, Write};

use bytes::Bytes;

use crate::cdp::{self, TransformError};
use crate::pipeline::parallelism::CancellationToken;
use crate::pipeline::types::PipelineError;
use crate::resonance::ResonanceMap;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::CdpError;
use crate::utils::best_chunk_size;

/// Read up to `len` bytes, stopping early only at EOF.
/// An empty result means the reader was already exhausted.
pub fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> Result<Bytes, CdpError> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        let n = r.read(&mut buf[off..])?;
        if n == 0 {
            break;
        }
        off += n;
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}

/// Forward-transform everything `reader` yields into two writers.
pub fn stream_forward<R, WC, WI>(
    mut reader: R,
    mut class_writer: WC,
    mut index_writer: WI,
    map: &ResonanceMap,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<TelemetrySnapshot, CdpError>
where
    R: Read,
    WC: Write,
    WI: Write,
{
    let chunk_size = best_chunk_size(Some(chunk_size), false);
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let mut class_buf = Vec::with_capacity(chunk_size);
    let mut index_buf = Vec::with_capacity(chunk_size);

    loop {
        if cancel.is_cancelled() {
            log::debug!("[STREAM] forward cancelled after {} chunks", counters.chunks);
            return Err(PipelineError::Cancelled { chunks_done: counters.chunks }.into());
        }

        let chunk = timer.time(Stage::Read, || read_exact_or_eof(&mut reader, chunk_size))?;
        if chunk.is_empty() {
            break;
        }

        class_buf.clear();
        index_buf.clear();
        timer.time(Stage::Forward, || cdp::forward_into(&chunk, map, &mut class_buf, &mut index_buf));
        counters.add_forward(chunk.len(), index_buf.iter().filter(|&&i| i == 0).count());

        timer.time(Stage::Write, || -> io::Result<()> {
            class_writer.write_all(&class_buf)?;
            index_writer.write_all(&index_buf)
        })?;
    }

    class_writer.flush()?;
    index_writer.flush()?;
    timer.finish();
    log::debug!("[STREAM] forward done: {} bytes in {} chunks", counters.bytes_forward, counters.chunks);
    Ok(TelemetrySnapshot::from(&counters, &timer))
}

/// Rebuild the source from two aligned streams, chunk by chunk.
///
/// Streams that end at different lengths fail with `LengthMismatch`
/// carrying the lengths seen so far.
pub fn stream_inverse<RC, RI, W>(
    mut class_reader: RC,
    mut index_reader: RI,
    mut writer: W,
    map: &ResonanceMap,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<TelemetrySnapshot, CdpError>
where
    RC: Read,
    RI: Read,
    W: Write,
{
    let chunk_size = best_chunk_size(Some(chunk_size), false);
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let mut out = Vec::with_capacity(chunk_size);
    let mut offset = 0usize;

    loop {
        if cancel.is_cancelled() {
            log::debug!("[STREAM] inverse cancelled after {} chunks", counters.chunks);
            return Err(PipelineError::Cancelled { chunks_done: counters.chunks }.into());
        }

        let (classes, indices) = timer.time(Stage::Read, || -> Result<_, CdpError> {
            Ok((
                read_exact_or_eof(&mut class_reader, chunk_size)?,
                read_exact_or_eof(&mut index_reader, chunk_size)?,
            ))
        })?;

        if classes.len() != indices.len() {
            return Err(TransformError::LengthMismatch {
                class_len: offset + classes.len(),
                index_len: offset + indices.len(),
            }
            .into());
        }
        if classes.is_empty() {
            break;
        }

        out.clear();
        timer
            .time(Stage::Inverse, || cdp::inverse_into(&classes, &indices, map, &mut out))
            .map_err(|e| e.offset_by(offset))?;
        counters.add_inverse(out.len());
        offset += classes.len();

        timer.time(Stage::Write, || writer.write_all(&out))?;
    }

    writer.flush()?;
    timer.finish();
    log::debug!("[STREAM] inverse done: {} bytes in {} chunks", counters.bytes_inverse, counters.chunks);
    Ok(TelemetrySnapshot::from(&counters, &timer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            // Never more than two bytes per call.
            let n = self.0.len().min(buf.len()).min(2);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_exact_or_eof_fills_across_short_reads() {
        let mut r = Trickle(&[1, 2, 3, 4, 5]);
        assert_eq!(&read_exact_or_eof(&mut r, 4).unwrap()[..], &[1, 2, 3, 4]);
        assert_eq!(&read_exact_or_eof(&mut r, 4).unwrap()[..], &[5]);
        assert!(read_exact_or_eof(&mut r, 4).unwrap().is_empty());
    }

    #[test]
    fn streaming_roundtrip_with_small_chunks() {
        let map = ResonanceMap::standard().unwrap();
        let src: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

        let (mut classes, mut indices) = (Vec::new(), Vec::new());
        let snap = stream_forward(Cursor::new(&src), &mut classes, &mut indices, &map, 7, &CancellationToken::new()).unwrap();
        assert_eq!(snap.bytes_forward, 1000);
        assert_eq!(snap.chunks, 143);

        let mut back = Vec::new();
        stream_inverse(Cursor::new(&classes), Cursor::new(&indices), &mut back, &map, 64, &CancellationToken::new()).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn uneven_streams_are_rejected() {
        let map = ResonanceMap::standard().unwrap();
        let err = stream_inverse(Cursor::new(vec![0u8; 5]), Cursor::new(vec![0u8; 4]), Vec::new(), &map, 16, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CdpError::Transform(TransformError::LengthMismatch { class_len: 5, index_len: 4 })
        ));
    }
}
