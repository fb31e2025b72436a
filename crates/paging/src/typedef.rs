/// Externally supplied page identifier.
pub type PageId = u64;

/// Index of a physical frame. Also the stable handle of the tracking record
/// for the page resident in that frame.
pub type FrameId = usize;

/// Logical reference time. Zero is never handed out and stands for "never".
pub type Timestamp = u64;
