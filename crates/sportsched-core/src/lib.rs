//! sportsched Core - instance model for compact double round-robin timetabling
//!
//! This crate provides the read-only problem description shared by every
//! other sportsched crate:
//! - Teams and slots with dense indices
//! - Interned team/slot groups
//! - The nine constraint families (CA1-CA4, GA1, BR1, BR2, FA2, SE1)
//! - The immutable [`Catalog`] with its reverse index
//! - An ITC2021 XML instance loader

pub mod catalog;
pub mod constraint;
pub mod error;
pub mod group;
pub mod index;
pub mod resource;
pub mod xml;


pub use catalog::{Catalog, CatalogBuilder};
pub use constraint::{
    Ca1, Ca2, Ca3, Ca4, Ca4Scope, ConstraintDef, ConstraintFamily, Br1, Br2, Fa2, Ga1, HomeMode,
    Se1, Severity,
};
pub use error::{CatalogError, Result};
pub use group::GroupTable;
pub use index::{FamilySets, ReverseIndex};
pub use resource::{Slot, Team};
pub use xml::{load_instance, parse_instance};
