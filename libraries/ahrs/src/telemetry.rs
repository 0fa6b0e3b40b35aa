//! Publishing of per-tick results

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::TickReport;
use crate::error::helpers::telemetry_error;
use crate::AhrsResult;

/// Column header of the tabular log
pub const CSV_HEADER: &str =
    "Time, AccelX, AccelY, AccelZ, VelX, VelY, VelZ, PosX, PosY, PosZ, Roll, Pitch, Yaw";

/// Consumer of completed ticks
pub trait TelemetrySink {
    fn publish(&mut self, report: &TickReport) -> AhrsResult<()>;
}

/// Writes one comma-separated row per tick under [`CSV_HEADER`]
pub struct CsvLogger<W: Write> {
    writer: W,
}

impl CsvLogger<BufWriter<File>> {
    /// Truncate `path` and start a fresh log there
    pub fn create(path: impl AsRef<Path>) -> AhrsResult<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| telemetry_error(format!("cannot create {}", path.display()), e))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvLogger<W> {
    /// Write the header to `writer`
    pub fn new(mut writer: W) -> AhrsResult<Self> {
        writeln!(writer, "{}", CSV_HEADER)
            .map_err(|e| telemetry_error("cannot write log header", e))?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TelemetrySink for CsvLogger<W> {
    fn publish(&mut self, report: &TickReport) -> AhrsResult<()> {
        let a = &report.corrected_accel;
        let v = &report.velocity;
        let p = &report.position;
        let o = &report.orientation.fused;
        writeln!(
            self.writer,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            report.timestamp, a.x, a.y, a.z, v.x, v.y, v.z, p.x, p.y, p.z, o.roll, o.pitch, o.yaw
        )
        .and_then(|_| self.writer.flush())
        .map_err(|e| telemetry_error("cannot append log row", e))
    }
}
