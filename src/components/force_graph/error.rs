//! Errors raised while ingesting graph data.

use thiserror::Error;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEnd {
	Source,
	Target,
}

impl std::fmt::Display for LinkEnd {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LinkEnd::Source => f.write_str("source"),
			LinkEnd::Target => f.write_str("target"),
		}
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
	#[error("link {link} {end} references unknown node `{id}`")]
	UnknownEndpoint { link: usize, end: LinkEnd, id: String },
}
