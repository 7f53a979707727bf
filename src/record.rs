//! Radiance scene description records.
//!
//! Every primitive in a `.rad`/`.mat` file has the same shape:
//!
//! ```text
//! modifier type identifier
//! N string arguments
//! 0
//! M real arguments
//! ```
//!
//! The integer argument list is always empty for the primitives we emit.

use std::fmt;

/// How real arguments are laid out after their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealLayout {
    /// On the count line.
    Inline,
    /// One indented row per `n` values below the count.
    Rows(usize),
}

/// A single Radiance primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub modifier: String,
    pub kind: &'static str,
    pub identifier: String,
    pub strings: Vec<String>,
    pub reals: Vec<f64>,
    pub layout: RealLayout,
}

impl Record {
    pub fn new(modifier: impl Into<String>, kind: &'static str, identifier: impl Into<String>) -> Self {
        Self {
            modifier: modifier.into(),
            kind,
            identifier: identifier.into(),
            strings: Vec::new(),
            reals: Vec::new(),
            layout: RealLayout::Inline,
        }
    }

    pub fn strings<I, S>(mut self, strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings.extend(strings.into_iter().map(Into::into));
        self
    }

    pub fn reals(mut self, reals: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(reals);
        self
    }

    /// Lay the real arguments out in rows of `n` (vertex lists, vectors).
    pub fn rows(mut self, n: usize) -> Self {
        self.layout = RealLayout::Rows(n.max(1));
        self
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.modifier, self.kind, self.identifier)?;

        write!(f, "{}", self.strings.len())?;
        for s in &self.strings {
            write!(f, " {}", s)?;
        }
        writeln!(f)?;
        writeln!(f, "0")?;

        write!(f, "{}", self.reals.len())?;
        match self.layout {
            RealLayout::Inline => {
                for r in &self.reals {
                    write!(f, " {:.6}", r)?;
                }
                writeln!(f)
            }
            RealLayout::Rows(n) => {
                writeln!(f)?;
                for row in self.reals.chunks(n) {
                    write!(f, " ")?;
                    for r in row {
                        write!(f, " {:.6}", r)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Append records to a buffer, separated by blank lines.
pub fn push_records(out: &mut String, records: &[Record]) {
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
}
