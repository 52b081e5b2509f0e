use std::io::{self, Write};

/// A CSV cell. Text is always quoted, numbers never are.
#[derive(Debug, Clone, Copy)]
pub enum CsvField<'a> {
    Text(&'a str),
    Int(usize),
    Float(f64),
}

pub fn write_row<W: Write>(w: &mut W, fields: &[CsvField<'_>]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        match field {
            CsvField::Text(s) => write!(w, "\"{}\"", s.replace('"', "\"\""))?,
            CsvField::Int(v) => write!(w, "{}", v)?,
            // Debug formatting keeps a trailing `.0` on integral values.
            CsvField::Float(v) => write!(w, "{:?}", v)?,
        }
    }
    w.write_all(b"\n")
}

pub fn write_header<W: Write>(w: &mut W, names: &[&str]) -> io::Result<()> {
    let fields: Vec<CsvField<'_>> = names.iter().map(|n| CsvField::Text(*n)).collect();
    write_row(w, &fields)
}
