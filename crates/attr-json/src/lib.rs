//! `attr-json`: schema-driven conversion between typed attribute containers
//! and plain JSON values.
//!
//! Schemas are registered in a [`Registry`]. An [`Encoder`] turns
//! [`Container`]s into `serde_json` objects and a [`Decoder`] does the
//! reverse, walking nested typed maps, dynamic maps, lists and discriminated
//! variant families.
//!
//! ```
//! use std::sync::Arc;
//! use attr_json::{Attribute, Container, Decoder, Encoder, Registry, Schema};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         Schema::model("Pet")
//!             .attribute("name", Attribute::unicode())
//!             .attribute("age", Attribute::number()),
//!     )
//!     .unwrap();
//! let registry = Arc::new(registry);
//!
//! let pet = Container::new("Pet").with("name", "Garfield").with("age", 43);
//! let encoded = Encoder::new(registry.clone()).encode(&pet).unwrap();
//! assert_eq!(json!(encoded), json!({"name": "Garfield", "age": 43}));
//!
//! let decoded = Decoder::new(registry).decode("Pet", &encoded).unwrap();
//! assert_eq!(decoded, pet);
//! ```

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod options;
pub mod schema;
pub mod value;

pub use codec::{BinaryFormat, CodecError, ScalarKind};
pub use decoder::{Decoder, ResolvedVariant};
pub use encoder::Encoder;
pub use error::{Error, RegistryError, Result};
pub use options::CodecOptions;
pub use schema::document::SchemaDocument;
pub use schema::{Attribute, ContainerKind, Family, Registry, Schema};
pub use value::{AttrValue, Container};
