/// Command line interface functionality
pub mod cli;
/// Message passing between the ranks of a group
pub mod comm;
/// Contains various shared data types
pub mod data_types;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Phase-by-phase timing of the sequential algorithm
pub mod profiling;
/// Various utility functions that tend to be very generic
pub mod util;
/// The distributed block wavefront and the shared-memory sweep
pub mod wavefront;
/// All output writers
pub mod writers;
