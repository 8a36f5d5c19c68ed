//! Unique class names
//!
//! Every mounted container, floating and fullsize element gets its own class
//! so injected rules apply to exactly that element.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of every allocated class name
pub const CLASS_PREFIX: &str = "flexy-uc-";

/// Source of unique class names
pub trait ClassNameAllocator {
    fn allocate(&self) -> String;
}

static PROCESS_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-wide counter; names never repeat within a process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessClassNames;

impl ClassNameAllocator for ProcessClassNames {
    fn allocate(&self) -> String {
        let n = PROCESS_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{CLASS_PREFIX}{n}")
    }
}

/// Deterministic sequence starting at 0, for reproducible output
#[derive(Debug, Default)]
pub struct SequentialClassNames {
    next: Cell<u64>,
}

impl SequentialClassNames {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassNameAllocator for SequentialClassNames {
    fn allocate(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{CLASS_PREFIX}{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_process_names_are_unique() {
        let names: HashSet<String> = (0..100).map(|_| ProcessClassNames.allocate()).collect();
        assert_eq!(names.len(), 100);
        assert!(names.iter().all(|n| n.starts_with(CLASS_PREFIX)));
    }

    #[test]
    fn test_sequential_names() {
        let names = SequentialClassNames::new();
        assert_eq!(names.allocate(), "flexy-uc-0");
        assert_eq!(names.allocate(), "flexy-uc-1");
    }
}
