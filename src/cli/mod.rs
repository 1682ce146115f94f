/*!
# CLI module
Command line interface functionality for lcs-wavefront.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The profile CLI subcommand
pub mod profile;
/// The run CLI subcommand
pub mod run;
/// The shared CLI subcommand
pub mod shared;
