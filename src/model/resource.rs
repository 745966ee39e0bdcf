use super::ResourceId;
use crate::time::Duration;

/// A shared resource protected by a spin lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    /// The cost of one critical section, charged per access.
    pub cost: Duration,
}

impl Resource {
    pub fn new(id: ResourceId, cost: Duration) -> Self {
        Resource { id, cost }
    }
}
