use std::path::{Path, PathBuf};

use tokio::{
    fs::File,
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
};

use crate::error::IoError;

/// Reads JSON-line requests from a script file or stdin. Blank lines and
/// lines starting with `#` are skipped.
pub struct RequestReader {
    lines: Lines<Box<dyn AsyncBufRead + Unpin + Send>>,
    path: Option<PathBuf>,
}

impl RequestReader {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let path_buf = path.as_ref().to_path_buf();

        match File::open(&path_buf).await {
            Ok(file) => Ok(Self {
                lines: Self::boxed(BufReader::new(file)),
                path: Some(path_buf),
            }),
            Err(error) => Err(IoError::File(error.kind())),
        }
    }

    pub fn stdin() -> Self {
        Self {
            lines: Self::boxed(BufReader::new(io::stdin())),
            path: None,
        }
    }

    fn boxed<R>(reader: R) -> Lines<Box<dyn AsyncBufRead + Unpin + Send>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        reader.lines()
    }

    /// `None` for stdin.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn next_request(&mut self) -> Result<Option<String>, IoError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|error| IoError::Reader(error.kind()))?;

            match line {
                None => return Ok(None),
                Some(line) => {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Ok(Some(line.to_owned()));
                }
            }
        }
    }
}
