/// Opaque id for one async backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Single-flight task slot (stored in state, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<TaskId> {
        self.active
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.active == Some(id)
    }

    /// Marks `id` as the in-flight task, superseding any previous one.
    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.is_active(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
