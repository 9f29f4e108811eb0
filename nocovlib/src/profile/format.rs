//! Writing coverage profiles back out.

use std::io::Write;

use super::Profile;
use crate::Result;

/// Streams profiles in the `go test -coverprofile` text format.
///
/// A coverage file carries a single `mode:` header no matter how many source
/// files it describes, so the writer emits the header once, for the first
/// profile it sees, and never again.
pub struct ProfileWriter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> ProfileWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    /// Emit the `mode:` header unless it has already been written.
    pub fn write_header(&mut self, profile: &Profile) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "mode: {}", profile.mode)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write every retained block of `profile`, preceded by the header if
    /// this is the first output.
    ///
    /// Returns the number of blocks written.
    pub fn write_profile(&mut self, profile: &Profile) -> Result<usize> {
        self.write_header(profile)?;

        let mut written = 0;
        for block in profile.blocks.iter().filter(|b| b.is_retained()) {
            writeln!(
                self.out,
                "{}:{}.{},{}.{} {} {}",
                profile.file_name,
                block.start_line,
                block.start_col,
                block.end_line,
                block.end_col,
                block.num_stmt,
                block.count
            )?;
            written += 1;
        }
        Ok(written)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a single profile, header included.
pub fn format_profile(profile: &Profile) -> String {
    let mut writer = ProfileWriter::new(Vec::new());
    writer
        .write_profile(profile)
        .expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}
