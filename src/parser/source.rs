//! Pull-based sample sources.
//!
//! The core consumes samples one at a time and never seeks backward. A
//! source yields `Ok(Some(sample))` per sample, `Ok(None)` at end of stream,
//! and `Err` on a decode fault, which aborts the batch.

use super::schema::Sample;
use crate::utils::error::SourceError;
use log::debug;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::Read;

/// An ordered-or-unordered stream of decoded samples
pub trait SampleSource {
    /// Pull the next sample; `Ok(None)` marks the end of the stream
    fn next_sample(&mut self) -> Result<Option<Sample>, SourceError>;
}

/// Reads JSON sample objects, one after another, from any reader
///
/// Objects may be newline-delimited or simply concatenated.
pub struct JsonSampleReader<R: Read> {
    stream: StreamDeserializer<'static, IoRead<R>, Sample>,
    leaf_first: bool,
    index: usize,
}

impl<R: Read> JsonSampleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(reader).into_iter::<Sample>(),
            leaf_first: false,
            index: 0,
        }
    }

    /// Input frames are ordered leaf first and must be reversed
    pub fn with_leaf_first(mut self, leaf_first: bool) -> Self {
        self.leaf_first = leaf_first;
        self
    }
}

impl<R: Read> SampleSource for JsonSampleReader<R> {
    fn next_sample(&mut self) -> Result<Option<Sample>, SourceError> {
        match self.stream.next() {
            None => Ok(None),
            Some(Ok(mut sample)) => {
                self.index += 1;
                if self.leaf_first {
                    sample.frames.reverse();
                }
                Ok(Some(sample))
            }
            Some(Err(e)) if e.is_io() => Err(SourceError::Io(e.into())),
            Some(Err(source)) => Err(SourceError::Decode {
                index: self.index,
                source,
            }),
        }
    }
}

/// In-memory source over an already decoded sample list
pub struct VecSampleSource {
    samples: std::vec::IntoIter<Sample>,
}

impl VecSampleSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }
}

impl SampleSource for VecSampleSource {
    fn next_sample(&mut self) -> Result<Option<Sample>, SourceError> {
        Ok(self.samples.next())
    }
}

/// Pull every sample from `source`, handing each to `visit`
///
/// Returns the number of samples visited. Stops at the first fault; whatever
/// the visitor built before that point is left intact.
pub fn drain_samples<S, F>(source: &mut S, mut visit: F) -> Result<usize, SourceError>
where
    S: SampleSource + ?Sized,
    F: FnMut(&Sample),
{
    let mut count = 0;
    while let Some(sample) = source.next_sample()? {
        visit(&sample);
        count += 1;
    }
    debug!("Drained {} samples from source", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::Frame;

    const TWO_SAMPLES: &str = r#"
        {"pid": 10, "tid": 11, "thread_name": "worker", "time_ns": 1000,
         "frames": [{"symbol": "main", "module": "app"}, {"symbol": "foo", "module": "app"}]}
        {"pid": 10, "tid": 11, "thread_name": "worker", "time_ns": 2000, "frames": []}
    "#;

    #[test]
    fn test_json_reader_reads_stream() {
        let mut reader = JsonSampleReader::new(TWO_SAMPLES.as_bytes());
        let first = reader.next_sample().unwrap().unwrap();
        assert_eq!(first.frames.len(), 2);
        assert_eq!(first.frames[0], Frame::new("main", "app"));
        let second = reader.next_sample().unwrap().unwrap();
        assert!(second.frames.is_empty());
        assert!(reader.next_sample().unwrap().is_none());
    }

    #[test]
    fn test_json_reader_leaf_first() {
        let mut reader = JsonSampleReader::new(TWO_SAMPLES.as_bytes()).with_leaf_first(true);
        let first = reader.next_sample().unwrap().unwrap();
        assert_eq!(first.frames[0], Frame::new("foo", "app"));
    }

    #[test]
    fn test_decode_fault_reports_index() {
        let input = r#"{"pid": 1, "tid": 1, "time_ns": 5} {"pid": "bad"}"#;
        let mut reader = JsonSampleReader::new(input.as_bytes());
        assert!(reader.next_sample().unwrap().is_some());
        match reader.next_sample() {
            Err(SourceError::Decode { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected decode fault, got {:?}", other),
        }
    }

    #[test]
    fn test_drain_stops_at_fault() {
        let input = r#"{"pid": 1, "tid": 1, "time_ns": 5} not-json"#;
        let mut reader = JsonSampleReader::new(input.as_bytes());
        let mut seen = 0;
        let result = drain_samples(&mut reader, |_| seen += 1);
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_drain_empty_stream() {
        let mut reader = JsonSampleReader::new("".as_bytes());
        assert_eq!(drain_samples(&mut reader, |_| {}).unwrap(), 0);
    }
}
