use crate::types::CodeId;

/// Hands out code identities for one table lineage.
///
/// Singletons are identified by their item, so multi-item codes are numbered
/// from the first id past the item universe. Trials are clones of the
/// accepted table, which makes the numbering depend only on the accepted
/// history.
#[derive(Clone, Debug)]
pub struct CodeIdAllocator {
    next: CodeId,
}

impl CodeIdAllocator {
    pub fn starting_at(first: CodeId) -> Self {
        Self { next: first }
    }

    pub fn allocate(&mut self) -> CodeId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Never hand out `id` or anything below it again.
    pub fn reserve(&mut self, id: CodeId) {
        self.next = self.next.max(id + 1);
    }
}
