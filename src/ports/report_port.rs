//! Report output port trait.

use crate::domain::error::TradesimError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::simulator::SimulationTrace;

/// Port for writing a completed run (full trace plus scalar summary).
pub trait ReportPort {
    fn write(
        &self,
        trace: &SimulationTrace,
        report: &PerformanceReport,
        output_path: &str,
    ) -> Result<(), TradesimError>;
}
