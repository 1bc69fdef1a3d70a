//! CSV persistence for comment rows: read from any `Read` (plain or zstd),
//! write with the fixed `date,author,subreddit,score,url,text` header.

use crate::error::{Error, Result};
use crate::paths::FileKind;
use crate::record::{Comment, CSV_HEADER};
use crate::util::ensure_parent_dir;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Real I/O failures become `Io`; anything about the data itself is `Parse`.
pub(crate) fn csv_error(origin: &str, e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::io(origin, io),
            other => Error::parse(format!("{origin}: {other:?}")),
        }
    } else {
        let row = e.position().map(|p| p.line()).unwrap_or(0);
        Error::parse(format!("{origin}, line {row}: {e}"))
    }
}

/// Parse every row. The first malformed row aborts the whole read.
pub fn read_comments<R: Read>(rdr: R, origin: &str) -> Result<Vec<Comment>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(rdr);

    let headers = reader.headers().map_err(|e| csv_error(origin, e))?.clone();
    for col in CSV_HEADER {
        if !headers.iter().any(|h| h == col) {
            return Err(Error::parse(format!("{origin}: missing column {col:?}")));
        }
    }

    let mut out = Vec::new();
    for row in reader.deserialize::<Comment>() {
        out.push(row.map_err(|e| csv_error(origin, e))?);
    }
    Ok(out)
}

/// Open a `.csv` or `.csv.zst` file and parse it.
pub fn read_comments_from_path(path: &Path) -> Result<Vec<Comment>> {
    let origin = path.display().to_string();
    let f = File::open(path).map_err(|e| Error::io(format!("open {origin}"), e))?;
    match FileKind::of(path) {
        Some(FileKind::CsvZst) => {
            let dec = zstd::stream::read::Decoder::new(f)
                .map_err(|e| Error::io(format!("zstd decode {origin}"), e))?;
            read_comments(dec, &origin)
        }
        _ => read_comments(BufReader::new(f), &origin),
    }
}

pub fn write_comments<W: Write>(w: W, comments: &[Comment]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    // serialize() writes the header from the struct field order.
    for c in comments {
        writer.serialize(c).map_err(|e| csv_error("csv output", e))?;
    }
    if comments.is_empty() {
        writer.write_record(CSV_HEADER).map_err(|e| csv_error("csv output", e))?;
    }
    writer
        .flush()
        .map_err(|e| Error::io("flush csv output", e))?;
    Ok(())
}

pub fn write_comments_to_path(path: &Path, comments: &[Comment]) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).map_err(|e| Error::io(format!("create {}", path.display()), e))?;
    let mut w = BufWriter::new(f);
    write_comments(&mut w, comments)?;
    w.flush().map_err(|e| Error::io(format!("flush {}", path.display()), e))?;
    Ok(())
}
