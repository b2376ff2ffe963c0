use super::{DataSink, SinkWriter, card_record};
use anyhow::Result;
use sift::Card;
use std::io::Write;

pub struct JsonlSink {
    writer: SinkWriter,
}

impl JsonlSink {
    pub fn new(writer: SinkWriter) -> Self {
        Self { writer }
    }
}

impl DataSink for JsonlSink {
    fn add_card(&mut self, card: &Card, category: Option<&str>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &card_record(card, category)?)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
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
    fn writes_one_record_per_line() {
        let temp_file = NamedTempFile::with_suffix(".jsonl").unwrap();
        let mut sink = JsonlSink::new(open_writer(Some(temp_file.path())).unwrap());

        let card = Card {
            name: "Grizzly Bears".into(),
            cmc: Some(2.0),
            ..Card::default()
        };
        sink.add_card(&card, Some("bear")).unwrap();
        sink.add_card(&card, None).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "Grizzly Bears");
        assert_eq!(lines[0]["category"], "bear");
        assert!(lines[1].get("category").is_none());
    }
}
