//! Subcommand bodies. Each takes plain paths and returns data so the
//! binary only parses arguments and prints.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use cdp_core::analysis::{self, ChannelReport};
use cdp_core::cdf::UnknownTagPolicy;
use cdp_core::cdp::DerivedStreams;
use cdp_core::pipeline::{self, CancellationToken, ParallelismProfile, Pipeline};
use cdp_core::resonance::{CanonicalDictionary, ResonanceMap};
use cdp_core::schema::{Schema, TagResolver};
use cdp_core::telemetry::TelemetrySnapshot;

/// One `(label, value)` pair as it appears in record JSON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub label: String,
    pub value: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub class_id: u8,
    pub members: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub class_count: usize,
    /// `(member_count, classes_of_that_size)`, ascending.
    pub sizes: Vec<(usize, usize)>,
    pub classes: Vec<ClassSummary>,
}

pub fn load_map(path: Option<&Path>) -> Result<ResonanceMap> {
    match path {
        Some(p) => ResonanceMap::from_path(p)
            .with_context(|| format!("loading resonance map {}", p.display())),
        None => ResonanceMap::standard().context("loading bundled resonance map"),
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    Schema::from_path(path).with_context(|| format!("loading schema {}", path.display()))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(f))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(f))
}

fn read_streams(classes: &Path, indices: &Path) -> Result<DerivedStreams> {
    Ok(DerivedStreams {
        class_stream: fs::read(classes).with_context(|| format!("reading {}", classes.display()))?,
        index_stream: fs::read(indices).with_context(|| format!("reading {}", indices.display()))?,
    })
}

pub fn forward(
    map: &ResonanceMap,
    input: &Path,
    classes: &Path,
    indices: &Path,
    chunk_size: usize,
) -> Result<TelemetrySnapshot> {
    let snapshot = pipeline::stream_forward(
        open(input)?,
        create(classes)?,
        create(indices)?,
        map,
        chunk_size,
        &CancellationToken::new(),
    )?;
    Ok(snapshot)
}

/// Rebuild `output` from the two channels; with `verify`, compare it
/// byte for byte against the original file.
pub fn inverse(
    map: &ResonanceMap,
    classes: &Path,
    indices: &Path,
    output: &Path,
    chunk_size: usize,
    verify: Option<&Path>,
) -> Result<TelemetrySnapshot> {
    let snapshot = pipeline::stream_inverse(
        open(classes)?,
        open(indices)?,
        create(output)?,
        map,
        chunk_size,
        &CancellationToken::new(),
    )?;

    if let Some(original) = verify {
        let rebuilt = fs::read(output).with_context(|| format!("reading {}", output.display()))?;
        let expected = fs::read(original).with_context(|| format!("reading {}", original.display()))?;
        if rebuilt != expected {
            bail!("verification failed: {} differs from {}", output.display(), original.display());
        }
        log::info!("verified {} against {}", output.display(), original.display());
    }
    Ok(snapshot)
}

pub fn encode(
    map: &ResonanceMap,
    schema: &Path,
    records: &Path,
    classes: &Path,
    indices: &Path,
    profile: &ParallelismProfile,
) -> Result<TelemetrySnapshot> {
    let schema = load_schema(schema)?;
    let fields: Vec<FieldRecord> = serde_json::from_reader(open(records)?)
        .with_context(|| format!("parsing records {}", records.display()))?;

    let dictionary = CanonicalDictionary::new(map);
    let pipeline = Pipeline::new(map, &dictionary, &schema);
    let (streams, snapshot) = pipeline.encode_parallel(
        fields.iter().map(|f| (f.label.as_str(), f.value)),
        profile,
        &CancellationToken::new(),
    )?;

    fs::write(classes, &streams.class_stream).with_context(|| format!("writing {}", classes.display()))?;
    fs::write(indices, &streams.index_stream).with_context(|| format!("writing {}", indices.display()))?;
    Ok(snapshot)
}

/// Decode both channels back to field records.
///
/// With `fields`, only those labels are returned and any other tag in the
/// stream, known or not, is ignored.
pub fn decode(
    map: &ResonanceMap,
    schema: &Path,
    classes: &Path,
    indices: &Path,
    policy: UnknownTagPolicy,
    fields: &[String],
    profile: &ParallelismProfile,
) -> Result<(Vec<FieldRecord>, TelemetrySnapshot)> {
    let schema = load_schema(schema)?;
    let streams = read_streams(classes, indices)?;
    let cancel = CancellationToken::new();
    let dictionary = CanonicalDictionary::new(map);
    let pipeline = Pipeline::new(map, &dictionary, &schema);

    let (decoded, snapshot) = if fields.is_empty() {
        let (decoded, snapshot) = pipeline.decode_parallel(&streams, policy, profile, &cancel)?;
        for skipped in &decoded.skipped {
            log::warn!("skipped unknown tag {} at record {}", skipped.tag, skipped.position);
        }
        (decoded.fields, snapshot)
    } else {
        let mut tags = Vec::with_capacity(fields.len());
        for label in fields {
            let tag = schema.hash_to_tag(label);
            if schema.lookup_label(tag) != Some(label.as_str()) {
                bail!("field '{}' is not part of schema '{}'", label, schema.name());
            }
            tags.push(tag);
        }
        pipeline.project_parallel(&streams, &tags, profile, &cancel)?
    };
    log::info!("decoded {} records in {:?}", snapshot.records_decoded, snapshot.elapsed);

    let records = decoded
        .iter()
        .map(|f| FieldRecord { label: f.label.to_owned(), value: f.value })
        .collect();
    Ok((records, snapshot))
}

pub fn analyze(map: &ResonanceMap, input: &Path, level: i32) -> Result<ChannelReport> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    Ok(analysis::analyze(&bytes, map, level)?)
}

pub fn inspect_map(map: &ResonanceMap) -> MapSummary {
    let mut sizes = std::collections::BTreeMap::new();
    let classes = map
        .classes()
        .map(|c| {
            *sizes.entry(c.len()).or_insert(0usize) += 1;
            ClassSummary { class_id: c.id, members: c.members.to_vec() }
        })
        .collect();

    MapSummary {
        class_count: map.class_count(),
        sizes: sizes.into_iter().collect(),
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCHEMA: &str = r#"{ "name": "vitals", "hasher": "crc32",
        "fields": [{"name": "heart_rate"}, {"name": "spo2"}, {"name": "temp"}] }"#;

    fn records() -> Vec<FieldRecord> {
        vec![
            FieldRecord { label: "heart_rate".into(), value: 75 },
            FieldRecord { label: "spo2".into(), value: 98 },
            FieldRecord { label: "temp".into(), value: 37 },
            FieldRecord { label: "heart_rate".into(), value: 255 },
        ]
    }

    #[test]
    fn forward_then_inverse_with_verify() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();
        fs::write(&input, &data).unwrap();

        let map = load_map(None).unwrap();
        let (c, i, out) = (dir.path().join("c.bin"), dir.path().join("i.bin"), dir.path().join("out.bin"));
        let snap = forward(&map, &input, &c, &i, 1024).unwrap();
        assert_eq!(snap.bytes_forward, 5000);

        inverse(&map, &c, &i, &out, 1024, Some(&input)).unwrap();
        assert_eq!(fs::read(&out).unwrap(), data);
    }

    #[test]
    fn verify_detects_mismatch() {
        let dir = tempdir().unwrap();
        let map = load_map(None).unwrap();
        let (input, other) = (dir.path().join("in.bin"), dir.path().join("other.bin"));
        fs::write(&input, b"abc").unwrap();
        fs::write(&other, b"abd").unwrap();

        let (c, i, out) = (dir.path().join("c.bin"), dir.path().join("i.bin"), dir.path().join("out.bin"));
        forward(&map, &input, &c, &i, 64).unwrap();
        assert!(inverse(&map, &c, &i, &out, 64, Some(&other)).is_err());
    }

    #[test]
    fn encode_decode_records() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        let recs = dir.path().join("records.json");
        fs::write(&schema, SCHEMA).unwrap();
        fs::write(&recs, serde_json::to_string(&records()).unwrap()).unwrap();

        let map = load_map(None).unwrap();
        let profile = ParallelismProfile::single_threaded().with_workers(2).with_chunk_size(4);
        let (c, i) = (dir.path().join("c.bin"), dir.path().join("i.bin"));
        let snap = encode(&map, &schema, &recs, &c, &i, &profile).unwrap();
        assert_eq!(snap.records_encoded, 4);
        assert_eq!(fs::read(&c).unwrap().len(), 12);

        let (back, snap) = decode(&map, &schema, &c, &i, UnknownTagPolicy::Abort, &[], &profile).unwrap();
        assert_eq!(back, records());
        assert_eq!(snap.records_decoded, 4);
        assert_eq!(snap.bytes_inverse, 12);

        let (only, snap) =
            decode(&map, &schema, &c, &i, UnknownTagPolicy::Abort, &["heart_rate".into()], &profile).unwrap();
        assert_eq!(only, vec![records()[0].clone(), records()[3].clone()]);
        assert_eq!(snap.records_decoded, 2);
        assert_eq!(snap.chunks, 3);
    }

    #[test]
    fn unknown_field_filter_is_an_error() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        fs::write(&schema, SCHEMA).unwrap();
        let (c, i) = (dir.path().join("c.bin"), dir.path().join("i.bin"));
        fs::write(&c, b"").unwrap();
        fs::write(&i, b"").unwrap();

        let map = load_map(None).unwrap();
        let res = decode(&map, &schema, &c, &i, UnknownTagPolicy::Abort, &["pulse".into()], &ParallelismProfile::single_threaded());
        assert!(res.is_err());
    }

    #[test]
    fn standard_map_summary() {
        let map = load_map(None).unwrap();
        let summary = inspect_map(&map);
        assert_eq!(summary.class_count, 96);
        assert_eq!(summary.sizes, vec![(2, 64), (4, 32)]);
    }
}
