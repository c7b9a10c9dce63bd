//! Box faces and the groups that share a texture

use serde::{Deserialize, Serialize};

/// Texture group shared by a pair of opposite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceGroup {
    /// Front and back faces
    Front,
    /// Right and left faces
    Side,
    /// Top and bottom faces
    Top,
}

impl FaceGroup {
    pub const ALL: [FaceGroup; 3] = [FaceGroup::Front, FaceGroup::Side, FaceGroup::Top];
}

/// One of the six box faces, in material-group order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSlot {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl FaceSlot {
    /// All faces in the order the box geometry emits its groups
    pub const ALL: [FaceSlot; 6] = [
        FaceSlot::Right,
        FaceSlot::Left,
        FaceSlot::Top,
        FaceSlot::Bottom,
        FaceSlot::Front,
        FaceSlot::Back,
    ];

    /// Texture group this face belongs to
    pub fn group(self) -> FaceGroup {
        match self {
            FaceSlot::Right | FaceSlot::Left => FaceGroup::Side,
            FaceSlot::Top | FaceSlot::Bottom => FaceGroup::Top,
            FaceSlot::Front | FaceSlot::Back => FaceGroup::Front,
        }
    }

    /// Index of this face's material group
    pub fn material_index(self) -> usize {
        self as usize
    }
}

/// One value per face group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSet<T> {
    pub front: T,
    pub side: T,
    pub top: T,
}

impl<T> FaceSet<T> {
    /// Create a set from its three members
    pub fn new(front: T, side: T, top: T) -> Self {
        Self { front, side, top }
    }

    /// Value for a group
    pub fn get(&self, group: FaceGroup) -> &T {
        match group {
            FaceGroup::Front => &self.front,
            FaceGroup::Side => &self.side,
            FaceGroup::Top => &self.top,
        }
    }

    /// Mutable value for a group
    pub fn get_mut(&mut self, group: FaceGroup) -> &mut T {
        match group {
            FaceGroup::Front => &mut self.front,
            FaceGroup::Side => &mut self.side,
            FaceGroup::Top => &mut self.top,
        }
    }

    /// Transform every member
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> FaceSet<U> {
        FaceSet {
            front: f(self.front),
            side: f(self.side),
            top: f(self.top),
        }
    }

    /// Iterate members in front, side, top order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.front, &self.side, &self.top].into_iter()
    }
}
