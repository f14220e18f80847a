use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use memmap2::Mmap;

use crate::input::InputError;

fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path)?;
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Runs `f` over a whole report. Plain files are handed over straight from the
/// read-only mapping; `.gz` files are decompressed first.
pub fn with_report_text<T>(path: &Path, f: impl FnOnce(&str) -> T) -> Result<T, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "report not found: {}",
            path.display()
        )));
    }
    if is_gz(path) {
        let mut text = String::new();
        MultiGzDecoder::new(File::open(path)?)
            .read_to_string(&mut text)
            .map_err(|e| InputError::Parse(format!("{}: {e}", path.display())))?;
        return Ok(f(&text));
    }

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(f(""));
    }
    // SAFETY: the mapping is read-only and outlives every borrow handed to `f`.
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap[..])
        .map_err(|e| InputError::Parse(format!("{} is not UTF-8: {e}", path.display())))?;
    Ok(f(text))
}
