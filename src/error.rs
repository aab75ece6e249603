//! Command-line Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration could not be loaded or was invalid.
    #[display("configuration error")]
    Config,
    /// A catalog or cache operation failed.
    #[display("{_0} failed")]
    Command(#[error(not(source))] &'static str),
    /// A command-line value was rejected.
    #[display("invalid argument")]
    Argument,
    #[display("could not write output")]
    Output,
}
