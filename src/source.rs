use anyhow::Context;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// The complete contents of a log file. Line structure is left untouched;
/// splitting into entries is the pipeline's job.
pub struct FileSource {
    text: String,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let metadata = file.metadata()?;

        if metadata.len() == 0 {
            return Ok(Self {
                text: String::new(),
            });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let text = std::str::from_utf8(&mmap)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?
            .to_string();
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

pub struct StdinSource {
    text: String,
}

impl StdinSource {
    /// Read all of stdin.
    pub fn read_all() -> anyhow::Result<Self> {
        Self::from_reader(io::stdin().lock())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("input is not valid UTF-8 text")?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
