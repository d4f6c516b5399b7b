/// All relational primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Catalog position of a stage within a project (1-based, fixed for the
/// lifetime of the project).
pub type StageId = u32;
