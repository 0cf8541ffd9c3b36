//! Truss nodes.

use crate::geometry::{dof_index, Axis, Point};

/// Handle to a node owned by a [`TrussStructure`](crate::TrussStructure).
///
/// The wrapped value is the node's 1-based ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// 1-based ID of the node.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Position of the node in its structure's node list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 - 1
    }

    /// 1-based global DOFs `[3n-2, 3n-1, 3n]` owned by this node.
    #[must_use]
    pub const fn dofs(self) -> [usize; 3] {
        [
            dof_index(self.0, Axis::X),
            dof_index(self.0, Axis::Y),
            dof_index(self.0, Axis::Z),
        ]
    }
}

/// A point of the truss that elements connect to.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Immutable 1-based ID.
    id: NodeId,
    /// Current position.
    position: Point,
}

impl Node {
    /// Create a node. IDs are normally handed out by
    /// [`TrussStructure::add_node`](crate::TrussStructure::add_node).
    pub(crate) fn new(id: NodeId, position: Point) -> Self {
        Self { id, position }
    }

    /// Handle and 1-based ID of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Overwrite the position.
    pub fn update_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = Point::new(x, y, z);
    }

    /// Translate the node by the given deltas.
    pub fn move_node(&mut self, dx: f64, dy: f64, dz: f64) {
        self.position.x += dx;
        self.position.y += dy;
        self.position.z += dz;
    }
}
