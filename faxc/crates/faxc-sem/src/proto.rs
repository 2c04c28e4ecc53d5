//! The prototype table: the most recently seen [`Prototype`] for each
//! function name, used to re-declare a function into a fresh back-end
//! module on demand (so a forward reference or a call from another
//! function can always find it).

use faxc_par::Prototype;
use faxc_util::{FxHashMap, Symbol};

#[derive(Default)]
pub struct PrototypeTable {
    prototypes: FxHashMap<Symbol, Prototype>,
}

impl PrototypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `proto` as the current definition of its name, replacing
    /// whatever was registered before it.
    pub fn install(&mut self, proto: Prototype) {
        self.prototypes.insert(proto.name, proto);
    }

    pub fn get(&self, name: Symbol) -> Option<&Prototype> {
        self.prototypes.get(&name)
    }
}
