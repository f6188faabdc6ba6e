/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Money amounts are integer cents. The engine records money but never
/// settles payments.
pub type Cents = i64;
