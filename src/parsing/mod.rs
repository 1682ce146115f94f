/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Loads plain sequence files
pub mod sequence_file;
