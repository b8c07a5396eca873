//! Synchronous transition notifications.

use super::machine::Machine;
use std::fmt;

/// Handle returned by [`Machine::on_transition`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&Machine) + Send + Sync>;

/// Subscribers notified once per committed transition, in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn register<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&self, machine: &Machine) {
        for (_, listener) in &self.entries {
            listener(machine);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
