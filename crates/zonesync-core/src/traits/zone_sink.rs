// # Zone Sink Trait
//
// The container populate hands grouped records to. Its consistency rules
// (what a duplicate means, what `lenient` relaxes) belong to the container.

use crate::record::DesiredRecord;

/// Destination for populated records
pub trait ZoneSink: Send {
    /// Fully-qualified, dot-terminated zone name
    fn name(&self) -> &str;

    /// Add one grouped record
    ///
    /// # Parameters
    ///
    /// - `record`: the record; ownership moves to the container
    /// - `lenient`: relax the container's own consistency checks
    ///
    /// # Returns
    ///
    /// - `Ok(())`: record accepted
    /// - `Err(Error)`: the container refused the record
    fn add_record(&mut self, record: DesiredRecord, lenient: bool) -> Result<(), crate::Error>;
}
