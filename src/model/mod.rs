//! Normalized representation of CVRF advisories.
//!
//! [`XmlValue`] is the generic tree the XML reader produces. The remaining
//! types are the typed model built from it: [`CvrfDocument`] at the top, the
//! product hierarchy ([`BranchNode`], [`Product`]) resolved by
//! [`tree`](crate::tree), and the [`Vulnerability`] entries.

mod document;
mod product;
mod value;
mod vulnerability;

pub use document::*;
pub use product::*;
pub use value::*;
pub use vulnerability::*;
