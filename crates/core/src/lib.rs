//! cerealbox-core: value model and type-dispatch encoder engine.
//!
//! An [`Encoder`] holds a [`RuleTable`] mapping [`TypeId`]s to [`Rule`]s.
//! Given a [`Value`], it walks the value's lineage (its own type, then its
//! supertypes) and applies the first rule registered along the way. Rule
//! tables for concrete wire formats live in the sibling crates
//! (`cerealbox-dynamo`, `cerealbox-jsonable`); this crate only knows how to
//! dispatch.
//!
//! # Public API
//!
//! - [`Value`], [`ValueSet`], [`EnumMember`], [`Object`] -- the value model
//! - [`TypeId`], [`Class`] -- type identifiers and class lineages
//! - [`Rule`], [`RuleTable`] -- conversion rules
//! - [`Encoder`], [`Context`], [`Passthrough`] -- the dispatch engine
//! - [`CodecConfig`] -- limits shared by encoders and decoders
//! - [`Error`] -- the error type of every conversion

pub mod config;
pub mod encoder;
pub mod error;
pub mod number;
pub mod rule;
pub mod temporal;
pub mod types;
pub mod value;

pub use config::CodecConfig;
pub use encoder::{Context, Encoder, Passthrough};
pub use error::Error;
pub use rule::{Rule, RuleTable};
pub use types::{Class, TypeId};
pub use value::{EnumMember, Object, Value, ValueSet};
