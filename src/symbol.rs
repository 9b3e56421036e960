use crate::value::{Cell, CellRef};
use rustc_hash::FxHashMap;
use std::cell::Cell as Slot;
use std::fmt;
use std::rc::Rc;

/// One name's slot in the global environment.
///
/// Generated code loads and stores `binding` through the entry's address, so
/// entries are leaked on creation and never move or disappear.
#[repr(C)]
pub struct EnvEntry {
    binding: Slot<u64>,
    name: Rc<str>,
}

/// Byte offset of the binding word inside an entry.
pub const BINDING_OFFSET: i32 = 0;

impl EnvEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cell currently bound to this name, if any.
    pub fn binding(&self) -> Option<CellRef> {
        // SAFETY: only `bind` and generated code write the binding word, and
        // both only ever store live cell addresses.
        unsafe { crate::value::cell_at(self.binding.get()) }
    }

    /// Address of the binding word, as embedded in generated code.
    pub fn slot_addr(&self) -> u64 {
        self.binding.as_ptr() as u64
    }
}

impl fmt::Debug for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvEntry")
            .field("name", &self.name)
            .field("binding", &self.binding())
            .finish()
    }
}

/// The single global namespace.
///
/// There is no lexical nesting: function parameters are bound by
/// overwriting the entry for their name, and nothing restores the previous
/// binding afterwards.
#[derive(Default)]
pub struct Env {
    entries: FxHashMap<Rc<str>, &'static EnvEntry>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            entries: FxHashMap::default(),
        }
    }

    /// The entry for `name`, created unbound on first use. Repeated calls
    /// return the same entry.
    pub fn intern(&mut self, name: &str) -> &'static EnvEntry {
        if let Some(entry) = self.entries.get(name) {
            return entry;
        }
        let name: Rc<str> = Rc::from(name);
        let entry: &'static EnvEntry = Box::leak(Box::new(EnvEntry {
            binding: Slot::new(0),
            name: name.clone(),
        }));
        self.entries.insert(name, entry);
        entry
    }

    pub fn lookup(&self, name: &str) -> Option<CellRef> {
        self.entries.get(name).and_then(|entry| entry.binding())
    }

    pub fn entry(&self, name: &str) -> Option<&'static EnvEntry> {
        self.entries.get(name).copied()
    }

    /// Overwrite an entry's binding. The previous binding is not kept.
    pub fn bind(&self, entry: &EnvEntry, value: &'static Cell) {
        entry.binding.set(value.addr());
    }

    /// Clear an entry's binding. The entry itself stays.
    pub fn unbind(&self, entry: &EnvEntry) {
        entry.binding.set(0);
    }

    /// Names of every bound entry, sorted.
    pub fn bound_names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<_> = self
            .entries
            .values()
            .filter(|entry| entry.binding().is_some())
            .map(|entry| entry.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("entries", &self.entries.len())
            .finish()
    }
}
