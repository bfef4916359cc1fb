//! Load-time integrity errors and engine errors.

use thiserror::Error;

/// A snapshot item that violates a load-time invariant.
///
/// The lenient loader drops the offending item and records one of these
/// instead of aborting the whole load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
	/// An edge endpoint names a node id absent from the snapshot.
	#[error("edge #{edge_index} ({source_id} -> {target_id}) references unknown node `{missing}`")]
	UnknownEndpoint {
		/// Position of the edge in the input list.
		edge_index: usize,
		/// Source id as given.
		source_id: String,
		/// Target id as given.
		target_id: String,
		/// The endpoint that could not be resolved.
		missing: String,
	},

	/// A node id appeared more than once; only the first occurrence is kept.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// A cluster lists a member that is not a node of the snapshot.
	#[error("cluster `{cluster_id}` lists unknown member `{node_id}`")]
	UnknownClusterMember {
		/// Cluster carrying the bad reference.
		cluster_id: String,
		/// The unresolved member id.
		node_id: String,
	},
}

/// Errors surfaced by the exploration engine.
#[derive(Error, Debug)]
pub enum GraphError {
	/// Snapshot integrity violation (strict loading only).
	#[error("Integrity error: {0}")]
	Integrity(#[from] IntegrityError),

	/// No node with this id exists in the loaded snapshot.
	#[error("Unknown node: {0}")]
	UnknownNode(String),

	/// The node exists but the active filter hides it.
	#[error("Node is filtered out: {0}")]
	NodeFilteredOut(String),

	/// The command is not valid in the current interaction state.
	#[error("Invalid transition: cannot {command} while {state}")]
	InvalidTransition {
		/// Command that was attempted.
		command: &'static str,
		/// Name of the state the controller was in.
		state: &'static str,
	},

	/// Undo requested with an empty history.
	#[error("Nothing to undo")]
	NothingToUndo,

	/// Redo requested with nothing undone.
	#[error("Nothing to redo")]
	NothingToRedo,

	/// The snapshot JSON could not be parsed.
	#[error("Snapshot parse error: {0}")]
	Snapshot(#[from] serde_json::Error),

	/// The configuration TOML could not be parsed.
	#[error("Configuration error: {0}")]
	Config(#[from] toml::de::Error),
}

/// Convenient Result type using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;
