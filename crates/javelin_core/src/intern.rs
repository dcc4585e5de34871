//! Identifier interning.
//!
//! Every identifier the parser builds is interned so that names compare as
//! integers. The interner is shared by all parses a `JavaParser` runs, so it
//! is backed by lasso's threaded rodeo.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// A handle to an interned identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.0)
    }
}

/// Thread-safe identifier interner. Cloning shares the underlying table.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
    known: KnownNames,
}

/// Contextual words the parser compares against on hot paths.
#[derive(Copy, Clone, Debug)]
pub struct KnownNames {
    pub var: InternedString,
    pub yield_: InternedString,
    pub record: InternedString,
    pub sealed: InternedString,
    pub permits: InternedString,
    pub non: InternedString,
    pub length: InternedString,
}

impl StringInterner {
    pub fn new() -> Self {
        let rodeo = Arc::new(ThreadedRodeo::new());
        let known = {
            let mut get = |s: &'static str| InternedString(rodeo.get_or_intern_static(s));
            KnownNames {
                var: get("var"),
                yield_: get("yield"),
                record: get("record"),
                sealed: get("sealed"),
                permits: get("permits"),
                non: get("non"),
                length: get("length"),
            }
        };
        Self { rodeo, known }
    }

    #[inline]
    pub fn intern(&self, s: &str) -> InternedString {
        InternedString(self.rodeo.get_or_intern(s))
    }

    /// Looks up a name without inserting it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.0)
    }

    #[inline]
    pub fn known(&self) -> &KnownNames {
        &self.known
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let interner = StringInterner::new();
        let a = interner.intern("fred");
        let b = interner.intern("fred");
        let c = interner.intern("Bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(c), "Bar");
    }

    #[test]
    fn test_known_names_are_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.get("var"), Some(interner.known().var));
        assert_eq!(interner.intern("yield"), interner.known().yield_);
        assert_eq!(interner.resolve(interner.known().permits), "permits");
    }

    #[test]
    fn test_clones_share_table() {
        let interner = StringInterner::new();
        let clone = interner.clone();
        let key = clone.intern("shared");
        assert_eq!(interner.get("shared"), Some(key));
    }
}
