use crate::state::{RoadId, Transition};

/// Address of a transition: the road it starts on and its index there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionRef {
    pub road: RoadId,
    pub index: usize,
}

/// A one-dimensional segment with its outgoing transitions.
///
/// Roads never change after construction and are shared between every clone
/// of the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Road {
    id: RoadId,
    length: i32,
    transitions: Vec<Transition>,
    /// Transitions elsewhere in the level that arrive on this road.
    reverse_transitions: Vec<TransitionRef>,
}

impl Road {
    pub fn new(id: RoadId, length: i32, transitions: Vec<Transition>) -> Self {
        Self {
            id,
            length,
            transitions,
            reverse_transitions: Vec::new(),
        }
    }

    /// Hub road of a floor.
    pub fn castle(length: i32, transitions: Vec<Transition>) -> Self {
        Self::new(RoadId::CASTLE, length, transitions)
    }

    pub const fn id(&self) -> RoadId {
        self.id
    }

    pub const fn length(&self) -> i32 {
        self.length
    }

    pub const fn is_castle(&self) -> bool {
        self.id.is_castle()
    }

    /// The mount can be picked up anywhere except on the castle road.
    pub const fn is_mount_available(&self) -> bool {
        !self.is_castle()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, index: usize) -> Option<&Transition> {
        self.transitions.get(index)
    }

    pub fn reverse_transitions(&self) -> &[TransitionRef] {
        &self.reverse_transitions
    }

    pub(crate) fn push_reverse_transition(&mut self, reference: TransitionRef) {
        self.reverse_transitions.push(reference);
    }
}
