use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest id that survives a round trip through a JavaScript number.
pub const MAX_RESOLVE_ID: u64 = (1 << 53) - 1;

/// Correlation token linking a host response to its `invoke` caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolveId(pub u64);

impl fmt::Display for ResolveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic resolve id source, owned by one bridge instance.
///
/// Ids wrap at [`MAX_RESOLVE_ID`]; after a wrap the caller-supplied
/// `in_use` check skips ids that are still outstanding.
#[derive(Debug, Default)]
pub struct ResolveIdGenerator {
    next: u64,
}

impl ResolveIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `first`. Used by tests that exercise wrap-around.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: first.min(MAX_RESOLVE_ID),
        }
    }

    pub fn next_free(&mut self, in_use: impl Fn(ResolveId) -> bool) -> ResolveId {
        loop {
            let candidate = ResolveId(self.next);
            self.next = if self.next >= MAX_RESOLVE_ID {
                0
            } else {
                self.next + 1
            };
            if !in_use(candidate) {
                return candidate;
            }
        }
    }
}

/// Identity of one UI surface / bridge instance, used to label log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_monotonic() {
        let mut ids = ResolveIdGenerator::new();
        let a = ids.next_free(|_| false);
        let b = ids.next_free(|_| false);
        let c = ids.next_free(|_| false);
        assert_eq!((a, b, c), (ResolveId(0), ResolveId(1), ResolveId(2)));
    }

    #[test]
    fn generator_skips_ids_in_use() {
        let mut ids = ResolveIdGenerator::new();
        let id = ids.next_free(|id| id.0 < 3);
        assert_eq!(id, ResolveId(3));
    }

    #[test]
    fn generator_wraps_at_js_safe_limit() {
        let mut ids = ResolveIdGenerator::starting_at(MAX_RESOLVE_ID);
        assert_eq!(ids.next_free(|_| false), ResolveId(MAX_RESOLVE_ID));
        assert_eq!(ids.next_free(|_| false), ResolveId(0));
    }

    #[test]
    fn generator_wrap_skips_outstanding() {
        let mut ids = ResolveIdGenerator::starting_at(MAX_RESOLVE_ID);
        let id = ids.next_free(|id| id == ResolveId(MAX_RESOLVE_ID) || id == ResolveId(0));
        assert_eq!(id, ResolveId(1));
    }

    #[test]
    fn resolve_id_serializes_as_number() {
        let json = serde_json::to_string(&ResolveId(42)).unwrap();
        assert_eq!(json, "42");
        let back: ResolveId = serde_json::from_str("42").unwrap();
        assert_eq!(back, ResolveId(42));
    }

    #[test]
    fn surface_id_is_uuid() {
        let sid = SurfaceId::new();
        assert!(uuid::Uuid::parse_str(sid.as_str()).is_ok());
    }

    #[test]
    fn surface_ids_are_unique() {
        assert_ne!(SurfaceId::new(), SurfaceId::default());
    }

    #[test]
    fn surface_id_display() {
        let sid = SurfaceId::new();
        assert_eq!(sid.to_string(), sid.as_str());
    }
}
