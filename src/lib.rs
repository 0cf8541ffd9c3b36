#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod cholesky;
mod config;
mod element;
mod errors;
mod geometry;
mod material;
mod matrix;
mod node;
mod structure;

pub use config::StructureConfig;
pub use element::{Element, ElementId, EntityLookup, TrussElement};
pub use errors::{DeletionError, MatrixError, PropertyError, TrussError};
pub use geometry::{dof_index, point, Axis, Point, DOFS_PER_NODE};
pub use material::{Material, MaterialId};
pub use matrix::Matrix;
pub use node::{Node, NodeId};
pub use structure::{Solution, TrussStructure};
