use std::io::{self, Write};

use crate::dynamics::state::{PSI, V1, V2, Y1, Y2, YAW_RATE};
use crate::sim::Sample;

/// Write trajectory samples in CSV format.
///
/// Columns: time, y1, y2, psi, v1, v2, r
pub fn write_trajectory<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "time,y1,y2,psi,v1,v2,r")?;

    for s in samples {
        let x = &s.state;
        writeln!(
            writer,
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.time, x[Y1], x[Y2], x[PSI], x[V1], x[V2], x[YAW_RATE],
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, samples)
}
