//! Error types for the encoder, decoder and schema registry.

use crate::codec::CodecError;

/// Errors raised while registering schemas.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("schema already registered: {0}")]
    DuplicateSchema(String),
    #[error("schema {schema} extends unregistered schema {parent}")]
    UnknownParent { schema: String, parent: String },
    #[error("schema {schema} is a {kind} but its parent {parent} is a {parent_kind}")]
    KindMismatch {
        schema: String,
        kind: &'static str,
        parent: String,
        parent_kind: &'static str,
    },
    #[error("schema {schema} declares a second discriminator {attribute}")]
    SecondDiscriminator { schema: String, attribute: String },
    #[error("schema {schema} has tag {tag:?} but no discriminator")]
    TagWithoutFamily { schema: String, tag: String },
    #[error("tag {tag:?} is already registered in family {family}")]
    DuplicateTag { family: String, tag: String },
}

/// Errors raised by [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown variant {tag:?} for family {family}")]
    UnknownVariant { family: String, tag: String },
    #[error("variant {resolved} does not extend {requested}")]
    VariantMismatch { requested: String, resolved: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown schema: {0}")]
    UnknownSchema(String),
    #[error("schema {schema} has no attribute {attribute}")]
    UnknownAttribute { schema: String, attribute: String },
    #[error("schema {schema} is not dynamic and cannot hold key {key}")]
    UnexpectedPassthrough { schema: String, key: String },
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
