//! Domain Layer
//!
//! The core of formsmith: pure logic over form schemas, without I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (FieldId, FieldType, Value)
//! - `entities/` - Schema shapes (FieldSpec, FormSchema)
//! - `services/` - Invariant checks, validation, derived fields, expressions
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
