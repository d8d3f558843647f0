//! Input and output utility.
use std::io;
use std::error::Error;
use std::fs::File;
use std::path::{self, Path};

pub mod txt;

/// Helper function for creating `io::Error` with
/// `io::ErrorKind::InvalidData`.
pub fn invalid_data<E>(error: E) -> io::Error
    where E: Into<Box<dyn Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Works just like Python's `os.path.splitext`.  Note that the returned
/// extension includes the dot.  If there is no extension, returns an
/// empty string as the extension.  Only works on UTF-8 strings due to
/// limitations of the `std::path::Path` API.
pub fn split_extension(path: &Path) -> io::Result<(&str, &str)> {
    let path = path.to_str()
        .ok_or_else(|| invalid_data("path is not UTF-8"))?;
    match path.rfind('.') {
        None => Ok((path, "")),
        Some(i) => {
            let ext = &path[i ..];
            if ext.chars().any(|c| path::is_separator(c)) {
                Ok((path, ""))
            } else {
                Ok((&path[.. i], ext))
            }
        }
    }
}

/// Open a compressed file and decode based on the file extension.
/// If the extension does not end in "z", the file is read as-is.
pub fn open_compressed(path: &Path) -> io::Result<Box<dyn io::Read>> {
    let file = File::open(path)?;
    let (_, ext) = split_extension(path)?;
    let ext = if ext.ends_with('z') { ext } else { "" };
    Ok(match ext {
        "" => Box::new(file),
        ".gz" => Box::new(flate2::read::GzDecoder::new(file)),
        ".xz" => Box::new(xz2::read::XzDecoder::new(file)),
        _ => return Err(invalid_data(
            format!("unrecognized compression format: {}", ext),
        )),
    })
}
