//! Source file reading
//!
//! Decodes source files to text, honouring a byte order mark when present.

use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::warn;

use crate::errors::{Result, read_error};

/// Reads a source file as text
///
/// The encoding is taken from a byte order mark and defaults to UTF-8. With
/// `lossy` set, malformed sequences are replaced by U+FFFD and a warning is
/// logged; otherwise they are a read error.
pub fn read_source(path: &Path, lossy: bool) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| read_error(e, path.to_path_buf()))?;
    decode(&bytes, lossy).map_err(|e| read_error(e, path.to_path_buf()))
}

fn decode(bytes: &[u8], lossy: bool) -> io::Result<String> {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_length..];

    if lossy {
        let (text, had_errors) = encoding.decode_without_bom_handling(body);
        if had_errors {
            warn!(
                "Replaced malformed {} sequences while decoding",
                encoding.name()
            );
        }
        return Ok(text.into_owned());
    }

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file is not valid {}", encoding.name()),
            )
        })
}
