use super::{DataSink, SinkWriter};
use anyhow::Result;
use sift::Card;
use std::io::Write;

/// One card name per line, tab-separated from its category.
pub struct TextSink {
    writer: SinkWriter,
}

impl TextSink {
    pub fn new(writer: SinkWriter) -> Self {
        Self { writer }
    }
}

impl DataSink for TextSink {
    fn add_card(&mut self, card: &Card, category: Option<&str>) -> Result<()> {
        match category {
            Some(category) => writeln!(self.writer, "{}\t{}", card.name, category)?,
            None => writeln!(self.writer, "{}", card.name)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
