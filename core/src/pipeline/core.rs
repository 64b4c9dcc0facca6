//! pipeline/core.rs
//!
//! `(label, value)` pairs -> CDF records -> class/index streams, and back.

use crate::cdf::{self, CdfCodec, DecodedField, DecodedStream, UnknownTagPolicy};
use crate::cdp::{self, DerivedStreams};
use crate::pipeline::chunked::{forward_counted, inverse_counted};
use crate::pipeline::parallelism::{CancellationToken, ParallelismProfile};
use crate::resonance::{CanonicalDictionary, ResonanceMap};
use crate::schema::TagResolver;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::CdpError;

pub struct Pipeline<'a, R: TagResolver + ?Sized> {
    map: &'a ResonanceMap,
    dictionary: &'a CanonicalDictionary,
    schema: &'a R,
}

impl<'a, R: TagResolver + ?Sized> Pipeline<'a, R> {
    /// `dictionary` must have been built from `map`.
    pub fn new(map: &'a ResonanceMap, dictionary: &'a CanonicalDictionary, schema: &'a R) -> Self {
        Self { map, dictionary, schema }
    }

    pub fn codec(&self) -> CdfCodec<'a> {
        CdfCodec::new(self.dictionary)
    }

    pub fn encode<I, L>(&self, pairs: I) -> Result<DerivedStreams, CdpError>
    where
        I: IntoIterator<Item = (L, u8)>,
        L: AsRef<str>,
    {
        let records = self.codec().encode_stream(pairs, self.schema)?;
        Ok(cdp::forward(&records, self.map))
    }

    pub fn decode(&self, streams: &DerivedStreams, policy: UnknownTagPolicy) -> Result<DecodedStream<'a>, CdpError> {
        let records = cdp::inverse(&streams.class_stream, &streams.index_stream, self.map)?;
        Ok(cdf::decode_stream(&records, self.schema, policy)?)
    }

    pub fn encode_with_telemetry<I, L>(&self, pairs: I) -> Result<(DerivedStreams, TelemetrySnapshot), CdpError>
    where
        I: IntoIterator<Item = (L, u8)>,
        L: AsRef<str>,
    {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        let records = timer.time(Stage::Encode, || self.codec().encode_stream(pairs, self.schema))?;
        counters.add_encoded(records.len() / cdf::CdfRecord::LEN);

        let streams = timer.time(Stage::Forward, || cdp::forward(&records, self.map));
        counters.add_forward(streams.len(), streams.index_stream.iter().filter(|&&i| i == 0).count());

        timer.finish();
        Ok((streams, TelemetrySnapshot::from(&counters, &timer)))
    }

    pub fn decode_with_telemetry(
        &self,
        streams: &DerivedStreams,
        policy: UnknownTagPolicy,
    ) -> Result<(DecodedStream<'a>, TelemetrySnapshot), CdpError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        let records =
            timer.time(Stage::Inverse, || cdp::inverse(&streams.class_stream, &streams.index_stream, self.map))?;
        counters.add_inverse(records.len());

        let decoded = timer.time(Stage::Decode, || cdf::decode_stream(&records, self.schema, policy))?;
        counters.add_decoded(decoded.fields.len(), decoded.skipped.len());

        timer.finish();
        Ok((decoded, TelemetrySnapshot::from(&counters, &timer)))
    }

    /// `encode` with the transform split across `profile.worker_count` threads.
    pub fn encode_parallel<I, L>(
        &self,
        pairs: I,
        profile: &ParallelismProfile,
        cancel: &CancellationToken,
    ) -> Result<(DerivedStreams, TelemetrySnapshot), CdpError>
    where
        I: IntoIterator<Item = (L, u8)>,
        L: AsRef<str>,
    {
        let mut timer = TelemetryTimer::new();

        let records = timer.time(Stage::Encode, || self.codec().encode_stream(pairs, self.schema))?;
        let (streams, mut counters) =
            timer.time(Stage::Forward, || forward_counted(&records, self.map, profile, cancel))?;
        counters.add_encoded(records.len() / cdf::CdfRecord::LEN);

        timer.finish();
        Ok((streams, TelemetrySnapshot::from(&counters, &timer)))
    }

    pub fn decode_parallel(
        &self,
        streams: &DerivedStreams,
        policy: UnknownTagPolicy,
        profile: &ParallelismProfile,
        cancel: &CancellationToken,
    ) -> Result<(DecodedStream<'a>, TelemetrySnapshot), CdpError> {
        let mut timer = TelemetryTimer::new();

        let (records, mut counters) = timer.time(Stage::Inverse, || {
            inverse_counted(&streams.class_stream, &streams.index_stream, self.map, profile, cancel)
        })?;

        let decoded = timer.time(Stage::Decode, || cdf::decode_stream(&records, self.schema, policy))?;
        counters.add_decoded(decoded.fields.len(), decoded.skipped.len());

        timer.finish();
        Ok((decoded, TelemetrySnapshot::from(&counters, &timer)))
    }

    /// `decode_parallel` restricted to `tags`; every other record is ignored,
    /// registered or not.
    pub fn project_parallel(
        &self,
        streams: &DerivedStreams,
        tags: &[u8],
        profile: &ParallelismProfile,
        cancel: &CancellationToken,
    ) -> Result<(Vec<DecodedField<'a>>, TelemetrySnapshot), CdpError> {
        let mut timer = TelemetryTimer::new();

        let (records, mut counters) = timer.time(Stage::Inverse, || {
            inverse_counted(&streams.class_stream, &streams.index_stream, self.map, profile, cancel)
        })?;

        let fields = timer.time(Stage::Decode, || cdf::project(&records, self.schema, tags))?;
        counters.add_decoded(fields.len(), 0);

        timer.finish();
        Ok((fields, TelemetrySnapshot::from(&counters, &timer)))
    }
}
