use super::{DataSink, SinkWriter, card_record};
use anyhow::Result;
use sift::Card;
use std::io::Write;

/// A single JSON array, streamed one element at a time.
pub struct JsonSink {
    writer: SinkWriter,
    first_card: bool,
}

impl JsonSink {
    pub fn new(mut writer: SinkWriter) -> Result<Self> {
        writeln!(writer, "[")?;
        Ok(Self {
            writer,
            first_card: true,
        })
    }
}

impl DataSink for JsonSink {
    fn add_card(&mut self, card: &Card, category: Option<&str>) -> Result<()> {
        if !self.first_card {
            writeln!(self.writer, ",")?;
        }
        self.first_card = false;

        write!(self.writer, "  ")?;
        serde_json::to_writer(&mut self.writer, &card_record(card, category)?)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.first_card {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "]")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::open_writer;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_a_valid_array() {
        let temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let mut sink = JsonSink::new(open_writer(Some(temp_file.path())).unwrap()).unwrap();

        for name in ["Opt", "Ponder"] {
            let card = Card {
                name: name.into(),
                ..Card::default()
            };
            sink.add_card(&card, None).unwrap();
        }
        sink.finish().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["name"], "Opt");
        assert_eq!(parsed[1]["name"], "Ponder");
    }

    #[test]
    fn empty_output_is_an_empty_array() {
        let temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let mut sink = JsonSink::new(open_writer(Some(temp_file.path())).unwrap()).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }
}
