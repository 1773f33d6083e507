pub type ItemId = usize;
pub type TransactionId = usize;
pub type CodeId = usize;

pub type Support = u32;
pub type Usage = u32;

/// Encoded lengths, in natural-log units.
pub type Nats = f64;

pub type ItemsetLength = usize;
