//! Factory registry for participant implementations.
//!
//! Maps a kind name (and string arguments, typically straight off a
//! command line) to a boxed [`Participant`]. The engine itself never
//! touches the registry; it is the boundary through which setup code
//! turns names into seats.

use std::collections::HashMap;
use thiserror::Error;

use super::scripted::Random;
use super::Participant;

/// Builds one participant from string arguments.
pub type ParticipantFactory =
    Box<dyn Fn(&[String]) -> Result<Box<dyn Participant>, RegistryError>>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown participant kind: {0}")]
    UnknownKind(String),
    #[error("bad arguments for {kind}: {reason}")]
    BadArguments { kind: String, reason: String },
}

/// Registry of participant factories, keyed by kind name.
#[derive(Default)]
pub struct ParticipantRegistry {
    factories: HashMap<String, ParticipantFactory>,
}

impl ParticipantRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in kinds:
    ///
    /// - `random`: plays a uniform hand and a random valid guess; takes
    ///   an optional display name as its only argument.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("random", |args| match args {
            [] => Ok(Box::new(Random::new("random")) as Box<dyn Participant>),
            [name] => Ok(Box::new(Random::new(name))),
            _ => Err(RegistryError::BadArguments {
                kind: "random".to_string(),
                reason: format!("expected at most 1 argument, got {}", args.len()),
            }),
        });
        registry
    }

    /// Register a factory under a kind name. A later registration under
    /// the same name replaces the earlier one.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&[String]) -> Result<Box<dyn Participant>, RegistryError> + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Build a participant of the given kind.
    pub fn build(
        &self,
        kind: &str,
        args: &[String],
    ) -> Result<Box<dyn Participant>, RegistryError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))?;
        factory(args)
    }

    /// The registered kind names, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
