//! **synteny-core** contains shared structures and behavior among synteny libraries.
//!
//! Coordinates are 0-based and half-open throughout.

pub mod assembly_names;
pub mod feature;
pub mod region;
mod strand;

pub use self::{
    assembly_names::{AssemblyNames, Orientation},
    feature::Feature,
    region::Region,
    strand::Strand,
};
