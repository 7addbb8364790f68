use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur when a pool needs the host to create new instances.
///
/// Conditions the pool handles on its own never show up here: releasing an instance the pool
/// does not know is reported as `false`, stale free list entries are skipped and prototypes are
/// registered on first use.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The host could not spawn a new instance, typically because it is out of resources.
    #[error("failed to spawn an instance of prototype {prototype}")]
    Spawn {
        /// Debug rendering of the prototype the pool tried to instantiate.
        prototype: String,

        /// The error reported by the host.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's [`Error`] type as the
/// error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;
    use std::io;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn spawn_error_names_prototype_and_keeps_source() {
        let error = Error::Spawn {
            prototype: "Cube".to_string(),
            source: Box::new(io::Error::other("out of memory")),
        };

        assert_eq!(
            error.to_string(),
            "failed to spawn an instance of prototype Cube"
        );

        let source = error.source().expect("spawn errors carry the host error");
        assert_eq!(source.to_string(), "out of memory");
    }
}
