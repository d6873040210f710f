use std::io::Write;
use std::path::Path;

use crate::sim::History;

/// Write sampled trajectory points as CSV.
///
/// Columns follow `FlightSample`: time, distance, altitude, speed, phase,
/// flight_path_angle, aoa. Angles are in radians.
pub fn write_history<W: Write>(writer: W, history: &History) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for sample in history {
        wtr.serialize(sample)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write sampled trajectory points to a CSV file at the given path.
pub fn write_history_file<P: AsRef<Path>>(path: P, history: &History) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    for sample in history {
        wtr.serialize(sample)?;
    }
    wtr.flush()?;
    Ok(())
}
