//! Unified document model.
//!
//! Every spec parser adapts its native structures into these types; the
//! spec-native ASTs never leave the parser modules. A [`Document`] is built
//! once through [`DocumentBuilder`] and is read-only afterwards.

mod component;
mod document;
mod identifiers;
mod license;
mod metadata;

pub use component::*;
pub use document::*;
pub use identifiers::*;
pub use license::*;
pub use metadata::*;
