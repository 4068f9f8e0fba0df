//! Reading and writing root tags through plain or gzip-compressed streams and
//! files.
//!
//! Compression only wraps the byte stream; the tag framing is identical in
//! both profiles.

use std::fs::File;
#[cfg(feature = "gzip")]
use std::io::{self, BufRead};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "gzip")]
use flate2::{bufread, read::GzDecoder, write::GzEncoder};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::{from_binary, to_binary, Value};

/// How the bytes of a document are stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Compression {
    /// Uncompressed binary tag data.
    #[default]
    None,
    /// Binary tag data inside a gzip stream.
    #[cfg(feature = "gzip")]
    #[cfg_attr(docsrs, doc(cfg(feature = "gzip")))]
    Gzip,
}

/// Decodes one root tag from `reader`.
///
/// With [`Compression::None`], bytes after the root tag are left in the
/// reader. With [`Compression::Gzip`], the gzip stream is read to its end so
/// that its checksum is verified; decompressed bytes after the root tag are
/// discarded. Use [`read_all_from`] to reject trailing data instead.
pub fn read_from<R: Read>(reader: R, compression: Compression) -> Result<(Value, String)> {
    match compression {
        Compression::None => from_binary(reader),
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(reader);

            let res = from_binary(&mut decoder)?;
            io::copy(&mut decoder, &mut io::sink())?;

            Ok(res)
        }
    }
}

/// Decodes the single root tag that makes up all of `reader`.
///
/// Unlike [`read_from`], the input must end right after the root tag:
/// trailing bytes, whether inside the decompressed data or after the gzip
/// stream, are a format error.
pub fn read_all_from<R: Read>(reader: R, compression: Compression) -> Result<(Value, String)> {
    let mut reader = BufReader::new(reader);

    match compression {
        Compression::None => read_exactly_one(&mut reader),
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            // The bufread decoder stops at the end of the gzip member, so
            // anything still buffered belongs to the outer stream.
            let res = read_exactly_one(bufread::GzDecoder::new(&mut reader))?;

            if !reader.fill_buf()?.is_empty() {
                return Err(Error::format("trailing data after gzip stream"));
            }

            Ok(res)
        }
    }
}

/// Reads the root tag stored in the file at `path`.
///
/// The file must contain exactly one document, as with [`read_all_from`].
/// The file is closed on every path out of this function.
pub fn read_file<P: AsRef<Path>>(path: P, compression: Compression) -> Result<(Value, String)> {
    let path = path.as_ref();

    debug!(path = %path.display(), ?compression, "reading root tag");

    let res = read_all_from(File::open(path)?, compression);

    match &res {
        Ok((value, root_name)) => {
            trace!(path = %path.display(), tag = %value.tag(), root_name = %root_name, "read root tag")
        }
        Err(e) => debug!(path = %path.display(), "failed to read root tag: {e}"),
    }

    res
}

fn read_exactly_one<R: Read>(mut reader: R) -> Result<(Value, String)> {
    let res = from_binary(&mut reader)?;

    let mut probe = [0_u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(Error::format("trailing data after root tag"));
    }

    Ok(res)
}

/// Writes `value` as a root tag named `root_name` to the file at `path`,
/// creating or truncating it.
///
/// All buffered data is flushed before returning so write errors are not lost.
/// The file is closed on every path out of this function, but a failed write
/// may leave a partially written file behind.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    value: &Value,
    root_name: &str,
    compression: Compression,
) -> Result<()> {
    let path = path.as_ref();

    debug!(path = %path.display(), ?compression, "writing root tag");

    let mut writer = BufWriter::new(File::create(path)?);

    write_to(&mut writer, value, root_name, compression)?;
    writer.flush()?;

    trace!(
        path = %path.display(),
        bytes = crate::written_size(value, root_name),
        "wrote root tag"
    );

    Ok(())
}
