use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// Interned name. Two atoms from the same table are equal exactly when they
/// are the same allocation, which for a table means the same text.
#[derive(Clone)]
pub struct Atom(Rc<str>);

impl Atom {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).cast::<u8>().hash(state);
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Atom {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Get-or-add string table shared by a navigator and its clones.
#[derive(Default)]
pub struct NameTable {
    names: RefCell<HashSet<Rc<str>>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_add(&self, name: &str) -> Atom {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let interned: Rc<str> = Rc::from(name);
        self.names.borrow_mut().insert(Rc::clone(&interned));
        Atom(interned)
    }

    /// Looks a name up without adding it.
    pub fn get(&self, name: &str) -> Option<Atom> {
        self.names.borrow().get(name).map(|rc| Atom(Rc::clone(rc)))
    }

    pub fn len(&self) -> usize {
        self.names.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.borrow().is_empty()
    }
}

impl fmt::Debug for NameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTable").field("len", &self.len()).finish()
    }
}
