use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use domain::{
    model::vo::{ParameterSet, ParameterValue},
    service::ParameterStore,
};

#[derive(Debug, thiserror::Error)]
pub enum ParameterFileError {
    #[error("Unknown file type: {0}")]
    UnknownFileType(PathBuf),
    #[error("Line {line} has no parameter name")]
    MissingKey { line: u64 },
}

/// Parameter file layouts, chosen by extension.
///
/// One parameter per line, name and value split by the first delimiter. A
/// line holding only a name is a flag that is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.txt`, written as `name: value`
    Colon,
    /// `.tsv` and `.tab`
    Tab,
    /// `.csv`
    Comma,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ParameterFileError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") => Ok(Self::Colon),
            Some("tsv" | "tab") => Ok(Self::Tab),
            Some("csv") => Ok(Self::Comma),
            _ => Err(ParameterFileError::UnknownFileType(path.to_owned())),
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            Self::Colon => b':',
            Self::Tab => b'\t',
            Self::Comma => b',',
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::Colon => ": ",
            Self::Tab => "\t",
            Self::Comma => ",",
        }
    }

    pub fn parse(self, content: &str) -> anyhow::Result<ParameterSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter())
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(content.as_bytes());

        let delimiter = char::from(self.delimiter()).to_string();
        let mut parameters = ParameterSet::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let Some(key) = record.get(0).map(str::trim) else {
                continue;
            };
            if key.is_empty() {
                if record.len() == 1 {
                    continue;
                }
                return Err(ParameterFileError::MissingKey { line }.into());
            }

            let value = record.iter().skip(1).collect::<Vec<_>>().join(&delimiter);
            let value = value.trim();
            if value.is_empty() {
                parameters.insert(key, true);
            } else {
                parameters.insert(key, value);
            }
        }
        Ok(parameters)
    }

    /// Flags that are not set are left out.
    pub fn render(self, parameters: &ParameterSet) -> String {
        let sep = self.separator();
        let mut out = String::new();
        for (key, value) in parameters.iter() {
            match value {
                ParameterValue::Text(v) => {
                    let _ = writeln!(out, "{key}{sep}{v}");
                }
                ParameterValue::Flag(true) => {
                    let _ = writeln!(out, "{key}");
                }
                ParameterValue::Flag(false) => {}
            }
        }
        out
    }
}

/// Parameter files on the local disk.
#[derive(Debug, Clone, Default)]
pub struct ParameterFiles;

#[async_trait::async_trait]
impl ParameterStore for ParameterFiles {
    async fn read(&self, path: &Path) -> anyhow::Result<ParameterSet> {
        let format = FileFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        format
            .parse(&content)
            .with_context(|| format!("Invalid parameter file {}", path.display()))
    }

    async fn write(&self, parameters: &ParameterSet, path: &Path) -> anyhow::Result<()> {
        let format = FileFormat::from_path(path)?;
        tokio::fs::write(path, format.render(parameters))
            .await
            .with_context(|| format!("Cannot write {}", path.display()))
    }
}
