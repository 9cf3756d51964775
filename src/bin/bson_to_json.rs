//! Convert a BSON document stream to a JSON array of MongoDB extended JSON.
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::PossibleValuesParser;
use colored::Colorize;
use json_schema_infer::source::{BsonStream, ExtJsonMode, ValueSource};

/// convert bson file contents to MongoDB extended JSON
#[derive(Parser, Debug)]
#[command(name = "bson-to-json", version)]
struct BsonToJson {
    /// BSON file ('-' for stdin)
    bson_file: PathBuf,

    /// spelling of types that have no plain JSON form
    #[arg(
        short = 'm',
        long,
        value_parser = PossibleValuesParser::new(ExtJsonMode::VALUES.iter().copied()),
        default_value = "relaxed"
    )]
    json_mode: String,
}

impl BsonToJson {
    fn run(&self) -> Result<()> {
        let mode: ExtJsonMode = self.json_mode.parse()?;
        let reader: Box<dyn std::io::Read> = if self.bson_file.as_os_str() == "-" {
            Box::new(std::io::stdin().lock())
        } else {
            let file = std::fs::File::open(&self.bson_file)
                .with_context(|| format!("failed to open {}", self.bson_file.display()))?;
            Box::new(std::io::BufReader::new(file))
        };
        let mut source = BsonStream::new(reader).with_mode(mode);
        // nothing is printed unless the whole stream decodes
        let mut docs = Vec::new();
        while let Some(value) = source.next_value()? {
            docs.push(value.to_json());
        }
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", serde_json::Value::Array(docs))?;
        Ok(())
    }
}

fn main() {
    if let Err(error) = BsonToJson::parse().run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
