//! TCX (Training Center XML) track loading.
//!
//! Only `<Trackpoint>` elements are read, and from each only `<Time>`,
//! `<LatitudeDegrees>` and `<LongitudeDegrees>`. Everything else (laps,
//! heart rate, altitude, extensions) is ignored. Namespace prefixes are
//! ignored too, so `<ns3:Trackpoint>` is read the same as `<Trackpoint>`.
//!
//! Trackpoints without a position or with an unreadable time/coordinate are
//! skipped rather than failing the whole file; watches routinely write
//! position-less points while searching for satellites.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use log::{debug, info};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, StopError};
use crate::TrackSample;

/// Fields collected while inside one `<Trackpoint>`.
#[derive(Debug, Default)]
struct PendingTrackpoint {
    time: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl PendingTrackpoint {
    fn into_sample(self) -> Option<TrackSample> {
        let time = self.time?;
        let timestamp_ms = match parse_timestamp(&time) {
            Ok(ts) => ts,
            Err(e) => {
                debug!("[Tcx] skipping trackpoint: {}", e);
                return None;
            }
        };
        let latitude: f64 = self.latitude?.trim().parse().ok()?;
        let longitude: f64 = self.longitude?.trim().parse().ok()?;

        Some(TrackSample::new(timestamp_ms, latitude, longitude))
    }
}

/// Parse a TCX timestamp into Unix milliseconds.
///
/// Accepts RFC 3339 (`2024-05-01T08:30:00.000Z`, `2024-05-01T10:30:00+02:00`).
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<i64> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().timestamp_millis());
    }

    Err(StopError::InvalidTimestamp {
        value: value.to_string(),
    })
}

/// Parse a TCX document into samples, in document order.
///
/// # Errors
///
/// Returns [`StopError::XmlParse`] if the document is not well-formed XML.
/// Individual bad trackpoints are skipped, not reported.
///
/// # Example
/// ```
/// use stop_detector::parse_tcx;
///
/// let xml = r#"<TrainingCenterDatabase><Activities><Activity><Lap><Track>
///   <Trackpoint>
///     <Time>2024-05-01T08:30:00Z</Time>
///     <Position>
///       <LatitudeDegrees>51.5074</LatitudeDegrees>
///       <LongitudeDegrees>-0.1278</LongitudeDegrees>
///     </Position>
///   </Trackpoint>
///   <Trackpoint><Time>2024-05-01T08:30:01Z</Time></Trackpoint>
/// </Track></Lap></Activity></Activities></TrainingCenterDatabase>"#;
///
/// let samples = parse_tcx(xml).unwrap();
/// assert_eq!(samples.len(), 1);
/// assert_eq!(samples[0].latitude, 51.5074);
/// ```
pub fn parse_tcx(xml: &str) -> Result<Vec<TrackSample>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut samples = Vec::new();
    let mut current: Option<PendingTrackpoint> = None;
    let mut seen = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| StopError::XmlParse {
            message: e.to_string(),
            position: reader.error_position() as u64,
        })?;

        match event {
            Event::Start(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"Trackpoint" => {
                        seen += 1;
                        current = Some(PendingTrackpoint::default());
                    }
                    b"Time" | b"LatitudeDegrees" | b"LongitudeDegrees" => {
                        let Some(pending) = current.as_mut() else {
                            continue;
                        };
                        let text = reader.read_text(e.name()).map_err(|err| StopError::XmlParse {
                            message: err.to_string(),
                            position: reader.error_position() as u64,
                        })?;
                        let slot = match local.as_ref() {
                            b"Time" => &mut pending.time,
                            b"LatitudeDegrees" => &mut pending.latitude,
                            _ => &mut pending.longitude,
                        };
                        // First occurrence wins
                        if slot.is_none() {
                            *slot = Some(text.into_owned());
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"Trackpoint" => {
                if let Some(sample) = current.take().and_then(PendingTrackpoint::into_sample) {
                    samples.push(sample);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    info!(
        "[Tcx] parsed {} of {} trackpoints ({} skipped)",
        samples.len(),
        seen,
        seen - samples.len()
    );

    Ok(samples)
}

/// Read and parse a TCX file.
pub fn load_tcx_file(path: impl AsRef<Path>) -> Result<Vec<TrackSample>> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;
    debug!("[Tcx] read {} bytes from {}", xml.len(), path.display());
    parse_tcx(&xml)
}
