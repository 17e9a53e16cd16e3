//! Arenas for type variables and tables.
//!
//! Both are append-only for id allocation. Type-variable slots start as
//! `Unknown` and are rebound in place during unification; the
//! write-once-then-check discipline is enforced by the engine, not here.

use super::ty::{Table, TableId, Type, TypeVarId};

/// Storage for unresolved type slots, addressed by `TypeVarId`.
#[derive(Debug, Clone, Default)]
pub struct TypeVarArena {
    slots: Vec<Type>,
}

impl TypeVarArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh slot, initially `Unknown`.
    pub fn alloc(&mut self) -> TypeVarId {
        let id = TypeVarId::from_raw(self.slots.len() as u32);
        self.slots.push(Type::UNKNOWN);
        id
    }

    #[inline]
    pub fn get(&self, id: TypeVarId) -> &Type {
        &self.slots[id.index()]
    }

    /// Rebind a slot. Callers go through the engine's coercion path, which
    /// only writes to slots that still resolve as unresolved.
    #[inline]
    pub fn set(&mut self, id: TypeVarId, ty: Type) {
        self.slots[id.index()] = ty;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeVarId::from_raw(i as u32), t))
    }
}

/// Storage for table field-maps, addressed by `TableId`.
#[derive(Debug, Clone, Default)]
pub struct TableArena {
    tables: Vec<Table>,
}

impl TableArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh empty table.
    pub fn alloc(&mut self) -> TableId {
        let id = TableId::from_raw(self.tables.len() as u32);
        self.tables.push(Table::new());
        id
    }

    #[inline]
    pub fn get(&self, id: TableId) -> &Table {
        &self.tables[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TableId) -> &mut Table {
        &mut self.tables[id.index()]
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(i, t)| (TableId::from_raw(i as u32), t))
    }
}
