//! Common types for the containers: allocation and capacity errors.

/// Errors returned by fallible container operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    /// The allocator could not provide room for `requested` elements.
    AllocationFailed { requested: usize },
    /// Growing the container would overflow `usize`.
    CapacityOverflow,
    /// A dictionary was requested with zero buckets.
    ZeroCapacity,
}

impl core::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CollectionError::AllocationFailed { requested } => {
                write!(f, "Allocation failed for {} elements", requested)
            }
            CollectionError::CapacityOverflow => write!(f, "Capacity overflow"),
            CollectionError::ZeroCapacity => write!(f, "Capacity must be greater than zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CollectionError {}
