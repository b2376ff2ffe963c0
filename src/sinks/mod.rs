use anyhow::{Context, Result};
use serde_json::Value;
use sift::Card;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub mod json;
pub mod jsonl;
pub mod text;

pub use self::json::JsonSink;
pub use self::jsonl::JsonlSink;
pub use self::text::TextSink;

pub type SinkWriter = BufWriter<Box<dyn Write + Send>>;

pub trait DataSink: Send {
    fn add_card(&mut self, card: &Card, category: Option<&str>) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// Open the output destination; `None` or `-` means stdout.
pub fn open_writer(path: Option<&Path>) -> Result<SinkWriter> {
    let target: Box<dyn Write + Send> = match path {
        Some(path) if path != Path::new("-") => Box::new(
            File::create(path)
                .with_context(|| format!("Output: Failed to create {}", path.display()))?,
        ),
        _ => Box::new(std::io::stdout()),
    };
    Ok(BufWriter::new(target))
}

/// The card's JSON record, with `category` added when classifying.
pub fn card_record(card: &Card, category: Option<&str>) -> Result<Value> {
    let mut record = serde_json::to_value(card)?;
    if let (Some(category), Value::Object(fields)) = (category, &mut record) {
        fields.insert("category".to_string(), Value::String(category.to_string()));
    }
    Ok(record)
}
