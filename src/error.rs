use thiserror::Error;

pub type Result<T> = std::result::Result<T, TournamentError>;

#[derive(Error, Debug)]
pub enum TournamentError {
	#[error("{0} not found")]
	NotFound(String),

	#[error("{what} is ambiguous: {count} records match")]
	Ambiguous { what: String, count: usize },

	#[error("invalid input: {0}")]
	Validation(String),

	#[error("{0} is already registered")]
	Duplicate(String),

	#[error("database error: {0}")]
	Database(#[from] rusqlite::Error),

	#[error("could not read match file: {0}")]
	Csv(#[from] csv::Error),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}
