use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn save_json<T: Serialize>(data: &T, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(&serde_json::to_vec_pretty(data)?)?;
    info!(path = %path.display(), "wrote JSON");
    Ok(())
}

pub fn save_text(content: &str, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    info!(path = %path.display(), "wrote text");
    Ok(())
}
