/// Roster identifiers are free-form strings (registration number, educator
/// number, or a name when neither exists).
pub type PersonId = String;

/// Buses are numbered from 1.
pub type BusId = u32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
