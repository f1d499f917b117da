use super::{Record, RecordValue, Recorder};
use std::collections::HashMap;

/// A recorder that keeps records in memory.
///
/// Stored records are aggregated on [`Recorder::flush`]: scalar values are
/// averaged per key and written as a single record, tagged with the
/// optimization step at flush time. This is used for inspecting training runs
/// in tests and examples.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(i64, Record)>,
    staged: Vec<Record>,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the flushed records and their steps.
    pub fn iter(&self) -> std::slice::Iter<(i64, Record)> {
        self.buf.iter()
    }

    fn aggregate(staged: &[Record]) -> Record {
        let mut sums: HashMap<String, (f32, usize)> = HashMap::new();
        for record in staged.iter() {
            for (k, v) in record.iter() {
                if let RecordValue::Scalar(x) = v {
                    let e = sums.entry(k.clone()).or_insert((0.0, 0));
                    e.0 += x;
                    e.1 += 1;
                }
            }
        }

        let mut record = Record::empty();
        for (k, (sum, n)) in sums.into_iter() {
            record.insert(k, RecordValue::Scalar(sum / n as f32));
        }
        record
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push((-1, record));
    }

    fn store(&mut self, record: Record) {
        self.staged.push(record);
    }

    fn flush(&mut self, step: i64) {
        let record = Self::aggregate(&self.staged);
        self.staged.clear();
        if !record.is_empty() {
            self.buf.push((step, record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_aggregates_scalars() {
        let mut recorder = BufferedRecorder::new();
        recorder.store(Record::from_scalar("mean_loss", 1.0));
        recorder.store(Record::from_scalar("mean_loss", 3.0));
        recorder.flush(10);

        let (step, record) = recorder.iter().next().unwrap();
        assert_eq!(*step, 10);
        assert_eq!(record.get_scalar("mean_loss").unwrap(), 2.0);
    }
}
