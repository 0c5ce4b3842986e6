//=========================================================================
// Listener Set
//
// Bookkeeping for the document-level pointer listeners the engine relies on.
//
// The engine has no real event target to attach to; instead it records
// which listeners a browser host would have installed, so that scoping
// rules can be observed and tested:
//
//   init()          → PointerDown (once, never removed)
//   session armed   → PointerMove + PointerUp (one-shot)
//   session settled → PointerMove and PointerUp removed
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== ListenerKind ========================================================

/// Document-level listener slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerUp,
}

impl ListenerKind {
    const ALL: [ListenerKind; 3] = [
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerUp,
    ];

    fn slot(self) -> usize {
        match self {
            ListenerKind::PointerDown => 0,
            ListenerKind::PointerMove => 1,
            ListenerKind::PointerUp => 2,
        }
    }
}

//=== ListenerSet =========================================================

/// Which listeners are live, and how often each was ever installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerSet {
    installed: [bool; 3],
    installs: [u32; 3],
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Mutation ---------------------------------------------------------

    /// Installs `kind`. Returns `false` (and changes nothing) if it is
    /// already live.
    pub fn install(&mut self, kind: ListenerKind) -> bool {
        let slot = kind.slot();
        if self.installed[slot] {
            return false;
        }
        self.installed[slot] = true;
        self.installs[slot] += 1;
        trace!(target: "drag", "listener installed: {:?}", kind);
        true
    }

    /// Removes `kind`. Returns `false` if it was not live.
    pub fn uninstall(&mut self, kind: ListenerKind) -> bool {
        let slot = kind.slot();
        let was_live = std::mem::replace(&mut self.installed[slot], false);
        if was_live {
            trace!(target: "drag", "listener removed: {:?}", kind);
        }
        was_live
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_installed(&self, kind: ListenerKind) -> bool {
        self.installed[kind.slot()]
    }

    /// Number of times `kind` went from absent to installed.
    pub fn install_count(&self, kind: ListenerKind) -> u32 {
        self.installs[kind.slot()]
    }

    /// Number of listeners currently live.
    pub fn live_count(&self) -> usize {
        ListenerKind::ALL
            .iter()
            .filter(|kind| self.is_installed(**kind))
            .count()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent_while_live() {
        let mut set = ListenerSet::new();
        assert!(set.install(ListenerKind::PointerDown));
        assert!(!set.install(ListenerKind::PointerDown));
        assert_eq!(set.install_count(ListenerKind::PointerDown), 1);
        assert_eq!(set.live_count(), 1);
    }

    #[test]
    fn reinstall_after_uninstall_counts_again() {
        let mut set = ListenerSet::new();
        set.install(ListenerKind::PointerMove);
        assert!(set.uninstall(ListenerKind::PointerMove));
        assert!(!set.uninstall(ListenerKind::PointerMove));
        set.install(ListenerKind::PointerMove);

        assert_eq!(set.install_count(ListenerKind::PointerMove), 2);
        assert!(set.is_installed(ListenerKind::PointerMove));
    }

    #[test]
    fn fresh_set_has_nothing_live() {
        let set = ListenerSet::new();
        assert_eq!(set.live_count(), 0);
        assert!(!set.is_installed(ListenerKind::PointerUp));
    }
}
