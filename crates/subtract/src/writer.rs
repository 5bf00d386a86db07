//! Writers for subtracted maps and the new run file

// crate modules
use crate::error::Result;

// gridtools modules
use gridtools_format::{f, NumFormat};

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use itertools::izip;
use log::trace;

/// Title line written above the carried header of every subtracted map
pub const MAP_TITLE: &str = "# Subtracted Cooling Map";

/// Write a subtracted cooling map
///
/// The map starts with the timestamp, the [MAP_TITLE] and the header lines
/// of the large map. Unset samples are written as zero.
pub fn write_cooling_map<P: AsRef<Path>>(
    path: P,
    timestamp: &str,
    header: &[String],
    temperature: &[f64],
    heating: &[Option<f64>],
    cooling: &[Option<f64>],
    mmw: &[Option<f64>],
) -> Result<()> {
    let path = path.as_ref();
    trace!("Writing map {}", path.display());

    let mut writer = init_writer(path)?;
    writeln!(writer, "# {timestamp}")?;
    writeln!(writer, "#")?;
    writeln!(writer, "{MAP_TITLE}")?;
    for line in header {
        writeln!(writer, "{line}")?;
    }

    for (t, h, c, m) in izip!(temperature, heating, cooling, mmw) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.6}",
            t.sci(6, 2),
            h.unwrap_or_default().sci(6, 2),
            c.unwrap_or_default().sci(6, 2),
            m.unwrap_or_default()
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Rewrite the large run file lines for the subtracted grid
///
/// A `# Subtraction started` line goes before `# Run started`, and the
/// output prefix and directory lines point at the new grid.
///
/// ```rust
/// # use gridtools_subtract::rewrite_run_header;
/// let lines = vec![
///     "# Run started Mon Mar  4 10:12:01 2024".to_string(),
///     "# outputFilePrefix = cooling".to_string(),
///     "# outputDir = grids/".to_string(),
///     "#run\thden".to_string(),
/// ];
/// let new = rewrite_run_header(&lines, "Tue Mar  5 09:00:00 2024", "metals", "sub/");
/// assert_eq!(new[0], "# Subtraction started Tue Mar  5 09:00:00 2024");
/// assert_eq!(new[1], lines[0]);
/// assert_eq!(new[2], "# outputFilePrefix = metals");
/// assert_eq!(new[3], "# outputDir = sub/");
/// assert_eq!(new[4], lines[3]);
/// ```
pub fn rewrite_run_header(
    lines: &[String],
    timestamp: &str,
    short_prefix: &str,
    base_dir: &str,
) -> Vec<String> {
    let mut rewritten = Vec::with_capacity(lines.len() + 1);
    for line in lines {
        if line.starts_with("# Run started") {
            rewritten.push(f!("# Subtraction started {timestamp}"));
            rewritten.push(line.clone());
        } else if line.starts_with("# outputFilePrefix") {
            rewritten.push(f!("# outputFilePrefix = {short_prefix}"));
        } else if line.starts_with("# outputDir") {
            rewritten.push(f!("# outputDir = {base_dir}"));
        } else {
            rewritten.push(line.clone());
        }
    }
    rewritten
}

/// Write lines to a file, each terminated by a newline
pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let mut writer = init_writer(path.as_ref())?;
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

fn init_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_layout() {
        let dir = std::env::temp_dir().join("gridtools-subtract-writer");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sub_run1.dat");

        write_cooling_map(
            &path,
            "now",
            &["#Te\tHeating\tCooling\tMMW".to_string()],
            &[1.0e4, 2.0e4],
            &[Some(1.5e-23), None],
            &[Some(-2.0e-22), Some(0.0)],
            &[Some(0.61), None],
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# now");
        assert_eq!(lines[1], "#");
        assert_eq!(lines[2], MAP_TITLE);
        assert_eq!(lines[3], "#Te\tHeating\tCooling\tMMW");
        assert_eq!(
            lines[4],
            "1.000000e+04\t1.500000e-23\t-2.000000e-22\t0.610000"
        );
        assert_eq!(
            lines[5],
            "2.000000e+04\t0.000000e+00\t0.000000e+00\t0.000000"
        );
    }
}
