//! CSV layout for recorded statistics.
//!
//! The document is a series of blank-line separated sections:
//!
//! ```text
//! Backend,StartTime,EndTime,Duration
//! Discrete,1.5,0,2.25
//!
//! Type,Id,Count
//! Key,A,3
//! Mouse,0,2
//!
//! Mouse0_X,Mouse0_Y
//! 640,360
//! ```
//!
//! The action backend writes an `Action,Count` section instead of
//! `Type,Id,Count`. Every positional source gets its own trailing section
//! with samples in recording order. Cells are RFC 4180 quoted as needed.

use std::collections::BTreeMap;

use playstats_common::error::{PlaystatsError, PlaystatsResult};
use playstats_model::{Backend, Point2, SampleSource, StatsSnapshot};

const SUMMARY_HEADER: [&str; 4] = ["Backend", "StartTime", "EndTime", "Duration"];
const DISCRETE_HEADER: [&str; 3] = ["Type", "Id", "Count"];
const ACTION_HEADER: [&str; 2] = ["Action", "Count"];
const KEY_TYPE: &str = "Key";
const MOUSE_TYPE: &str = "Mouse";
const X_SUFFIX: &str = "_X";
const Y_SUFFIX: &str = "_Y";

/// Render `snapshot` as CSV text.
pub fn generate_csv(snapshot: &StatsSnapshot) -> PlaystatsResult<String> {
    let mut sections = Vec::new();

    let end_time = if snapshot.is_recording {
        0.0
    } else {
        snapshot.end_time
    };
    sections.push(write_section(|w| {
        w.write_record(SUMMARY_HEADER)?;
        w.write_record([
            snapshot.backend.to_string(),
            snapshot.start_time.to_string(),
            end_time.to_string(),
            snapshot.duration_secs().to_string(),
        ])
    })?);

    sections.push(write_section(|w| {
        match snapshot.backend {
            Backend::Discrete => {
                w.write_record(DISCRETE_HEADER)?;
                for (source, count) in &snapshot.counts {
                    let count = count.to_string();
                    match source {
                        SampleSource::Key(code) => {
                            w.write_record([KEY_TYPE, code.as_str(), count.as_str()])?
                        }
                        SampleSource::MouseButton(button) => {
                            let button = button.to_string();
                            w.write_record([MOUSE_TYPE, button.as_str(), count.as_str()])?
                        }
                        SampleSource::Action(_) => {}
                    }
                }
            }
            Backend::Action => {
                w.write_record(ACTION_HEADER)?;
                for (source, count) in &snapshot.counts {
                    if let SampleSource::Action(name) = source {
                        w.write_record([name.as_str(), count.to_string().as_str()])?;
                    }
                }
            }
        }
        Ok(())
    })?);

    for (source, points) in &snapshot.positions {
        let name = source.name();
        sections.push(write_section(|w| {
            w.write_record([format!("{name}{X_SUFFIX}"), format!("{name}{Y_SUFFIX}")])?;
            for point in points {
                w.write_record([point.x.to_string(), point.y.to_string()])?;
            }
            Ok(())
        })?);
    }

    Ok(sections.join("\n"))
}

fn write_section<F>(fill: F) -> PlaystatsResult<String>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    fill(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| PlaystatsError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PlaystatsError::export(format!("CSV is not UTF-8: {e}")))
}

/// Statistics recovered from an exported CSV.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedStats {
    pub backend: Backend,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub counts: BTreeMap<SampleSource, u64>,
    pub positions: BTreeMap<SampleSource, Vec<Point2>>,
}

/// Parse CSV text produced by [`generate_csv`].
pub fn parse_csv(text: &str) -> PlaystatsResult<ParsedStats> {
    let mut sections = split_sections(text).into_iter().map(read_section);

    let summary = sections
        .next()
        .ok_or_else(|| PlaystatsError::export("CSV is empty"))??;
    let mut parsed = parse_summary(&summary)?;

    let counts = sections
        .next()
        .ok_or_else(|| PlaystatsError::export("CSV has no count section"))??;
    parsed.counts = parse_counts(&counts, parsed.backend)?;

    for section in sections {
        let (source, points) = parse_positions(&section?, parsed.backend)?;
        parsed.positions.insert(source, points);
    }

    Ok(parsed)
}

/// Split `text` at blank lines that sit outside quoted cells.
fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut in_quotes = false;
    let mut line_start = 0;
    let mut section_start = 0;

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                let line = &text[line_start..i];
                if line.is_empty() || line == "\r" {
                    sections.push(&text[section_start..line_start]);
                    section_start = i + 1;
                }
                line_start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(&text[section_start..]);

    sections.retain(|section| !section.trim().is_empty());
    sections
}

fn read_section(section: &str) -> PlaystatsResult<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(section.as_bytes());
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn parse_summary(rows: &[csv::StringRecord]) -> PlaystatsResult<ParsedStats> {
    match rows {
        [header, values] if header.iter().eq(SUMMARY_HEADER) => {
            let backend = field(values, 0)?
                .parse::<Backend>()
                .map_err(|e| PlaystatsError::export(e.to_string()))?;
            Ok(ParsedStats {
                backend,
                start_time: parse_number(field(values, 1)?)?,
                end_time: parse_number(field(values, 2)?)?,
                duration: parse_number(field(values, 3)?)?,
                ..Default::default()
            })
        }
        _ => Err(PlaystatsError::export("CSV summary section is malformed")),
    }
}

fn parse_counts(
    rows: &[csv::StringRecord],
    backend: Backend,
) -> PlaystatsResult<BTreeMap<SampleSource, u64>> {
    let Some((header, rows)) = rows.split_first() else {
        return Err(PlaystatsError::export("CSV count section is empty"));
    };

    let mut counts = BTreeMap::new();
    match backend {
        Backend::Discrete => {
            if !header.iter().eq(DISCRETE_HEADER) {
                return Err(PlaystatsError::export("expected a Type,Id,Count section"));
            }
            for row in rows {
                let id = field(row, 1)?;
                let source = match field(row, 0)? {
                    KEY_TYPE => SampleSource::Key(id.to_string()),
                    MOUSE_TYPE => SampleSource::MouseButton(parse_number(id)?),
                    other => {
                        return Err(PlaystatsError::export(format!(
                            "unknown discrete row type '{other}'"
                        )))
                    }
                };
                counts.insert(source, parse_number(field(row, 2)?)?);
            }
        }
        Backend::Action => {
            if !header.iter().eq(ACTION_HEADER) {
                return Err(PlaystatsError::export("expected an Action,Count section"));
            }
            for row in rows {
                let source = SampleSource::Action(field(row, 0)?.to_string());
                counts.insert(source, parse_number(field(row, 1)?)?);
            }
        }
    }
    Ok(counts)
}

fn parse_positions(
    rows: &[csv::StringRecord],
    backend: Backend,
) -> PlaystatsResult<(SampleSource, Vec<Point2>)> {
    let Some((header, rows)) = rows.split_first() else {
        return Err(PlaystatsError::export("CSV position section is empty"));
    };
    let name = field(header, 0)?
        .strip_suffix(X_SUFFIX)
        .ok_or_else(|| PlaystatsError::export("position header must end in _X"))?;
    let source = source_for_name(name, backend);

    let points = rows
        .iter()
        .map(|row| {
            Ok(Point2::new(
                parse_number(field(row, 0)?)?,
                parse_number(field(row, 1)?)?,
            ))
        })
        .collect::<PlaystatsResult<Vec<_>>>()?;
    Ok((source, points))
}

/// Positional sources are mouse buttons under the discrete backend and
/// actions otherwise.
fn source_for_name(name: &str, backend: Backend) -> SampleSource {
    if backend == Backend::Discrete {
        if let Some(button) = name
            .strip_prefix(MOUSE_TYPE)
            .and_then(|index| index.parse::<u8>().ok())
        {
            return SampleSource::MouseButton(button);
        }
    }
    SampleSource::Action(name.to_string())
}

fn field(row: &csv::StringRecord, index: usize) -> PlaystatsResult<&str> {
    row.get(index)
        .ok_or_else(|| PlaystatsError::export(format!("CSV row is missing column {index}")))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> PlaystatsResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| PlaystatsError::export(format!("invalid number '{raw}': {e}")))
}
