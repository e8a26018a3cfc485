//! Schema IDL generation stages.

pub mod classify;
pub mod fields;
pub mod flatten;
pub mod imports;
pub mod resolver;

pub use classify::{Classification, Classifier, Role};
pub use fields::{FieldBlock, FieldEmitter, FieldLine, ListWrapper};
pub use flatten::Flattener;
pub use imports::{ImportSet, collect_imports};
pub use resolver::{ResolvedType, TypeResolver, TypeSource};
