use std::fmt;
use std::marker::PhantomData;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Id<T> {
    pub id: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(id: &str) -> Self {
        Id::new(id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct EndpointTag;

pub type EndpointId = Id<EndpointTag>;

/// Unordered pair of endpoints, stored sorted.
///
/// Identifies a link (its two ends) and a route (its first and last waypoint).
/// `EndpointPair::new(a, b) == EndpointPair::new(b, a)` always holds.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct EndpointPair {
    low: EndpointId,
    high: EndpointId,
}

impl EndpointPair {
    pub fn new(a: impl Into<EndpointId>, b: impl Into<EndpointId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b { Self { low: a, high: b } } else { Self { low: b, high: a } }
    }

    /// The lexicographically smaller endpoint.
    pub fn low(&self) -> &EndpointId {
        &self.low
    }

    /// The lexicographically larger endpoint.
    pub fn high(&self) -> &EndpointId {
        &self.high
    }
}

impl fmt::Display for EndpointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.low, self.high)
    }
}

impl fmt::Debug for EndpointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndpointPair({}<->{})", self.low, self.high)
    }
}
