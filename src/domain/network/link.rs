use std::fmt;

use crate::domain::utils::id::{EndpointId, EndpointPair};
use crate::error::{Error, Result};

/// Loads smaller than this (in magnitude) left behind by a release are treated as zero.
/// Absorbs floating point residue from summing fractional amounts.
pub const LOAD_TOLERANCE: f64 = 1e-9;

/// An undirected, capacity bounded connection between two endpoints.
///
/// `used` only changes through [`Link::allocate`] and [`Link::release`], which are driven
/// by a [`Route`](crate::domain::network::route::Route) after it checked every link on its path.
#[derive(Debug, Clone)]
pub struct Link {
    endpoints: EndpointPair,

    /// The maximum bandwidth of this link. Remains constant.
    capacity: f64,

    /// The bandwidth currently held by active allocations.
    used: f64,
}

impl Link {
    /// Creates a link with no load.
    ///
    /// # Errors
    /// `Error::InvalidCapacity` if `capacity` is negative, NaN or infinite.
    pub fn new(a: impl Into<EndpointId>, b: impl Into<EndpointId>, capacity: f64) -> Result<Self> {
        let endpoints = EndpointPair::new(a, b);

        if !capacity.is_finite() || capacity < 0.0 {
            return Err(Error::InvalidCapacity { endpoints, capacity });
        }

        Ok(Self { endpoints, capacity, used: 0.0 })
    }

    pub fn endpoints(&self) -> &EndpointPair {
        &self.endpoints
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn used(&self) -> f64 {
        self.used
    }

    pub fn available(&self) -> f64 {
        self.capacity - self.used
    }

    pub fn can_allocate(&self, amount: f64) -> bool {
        self.used + amount <= self.capacity
    }

    /// Adds `amount` to the load without checking capacity.
    /// Callers check [`Link::can_allocate`] first.
    pub fn allocate(&mut self, amount: f64) {
        self.used += amount;
    }

    /// Removes `amount` from the load.
    ///
    /// # Errors
    /// `Error::CapacityUnderflow` if the load would become negative. This means the amount was
    /// never allocated on this link; `used` is left untouched.
    pub fn release(&mut self, amount: f64) -> Result<()> {
        let remaining = self.used - amount;

        if remaining < -LOAD_TOLERANCE {
            log::error!(
                "Release of {} on link {} results in a negative load (used: {}) --> Signals an error in the implementation.",
                amount,
                self.endpoints,
                self.used
            );
            return Err(Error::CapacityUnderflow { endpoints: self.endpoints.clone(), used: self.used, amount });
        }

        self.used = if remaining.abs() < LOAD_TOLERANCE { 0.0 } else { remaining };
        Ok(())
    }

    /// Fraction of the capacity in use, 0.0 for links without capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0.0 { 0.0 } else { self.used / self.capacity }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Link {} {}/{}>", self.endpoints, self.used, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_is_empty() {
        let link = Link::new("B", "A", 10.0).unwrap();

        assert_eq!(link.used(), 0.0);
        assert_eq!(link.capacity(), 10.0);
        assert_eq!(link.endpoints(), &EndpointPair::new("A", "B"));
    }

    #[test]
    fn test_rejects_invalid_capacity() {
        assert!(matches!(Link::new("A", "B", -1.0), Err(Error::InvalidCapacity { .. })));
        assert!(matches!(Link::new("A", "B", f64::NAN), Err(Error::InvalidCapacity { .. })));
        assert!(matches!(Link::new("A", "B", f64::INFINITY), Err(Error::InvalidCapacity { .. })));
        assert!(Link::new("A", "B", 0.0).is_ok());
    }

    #[test]
    fn test_can_allocate_up_to_capacity() {
        let mut link = Link::new("A", "B", 10.0).unwrap();

        assert!(link.can_allocate(10.0));
        assert!(!link.can_allocate(10.5));

        link.allocate(4.0);
        assert!(link.can_allocate(6.0));
        assert!(!link.can_allocate(6.1));
        assert_eq!(link.available(), 6.0);
    }

    #[test]
    fn test_release_restores_load() {
        let mut link = Link::new("A", "B", 10.0).unwrap();

        link.allocate(0.1);
        link.allocate(0.2);
        link.release(0.2).unwrap();
        link.release(0.1).unwrap();

        assert_eq!(link.used(), 0.0);
    }

    #[test]
    fn test_release_below_zero_fails() {
        let mut link = Link::new("A", "B", 10.0).unwrap();
        link.allocate(2.0);

        let result = link.release(3.0);

        assert!(matches!(result, Err(Error::CapacityUnderflow { .. })));
        assert_eq!(link.used(), 2.0, "A failed release must not change the load");
    }

    #[test]
    fn test_display() {
        let mut link = Link::new("A", "B", 10.0).unwrap();
        link.allocate(2.5);

        assert_eq!(link.to_string(), "<Link A<->B 2.5/10>");
        assert_eq!(link.utilization(), 0.25);
    }
}
