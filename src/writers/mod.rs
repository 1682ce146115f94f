/*!
# Writers module
Contains the logic for writing the optional output files of the run and profile commands.
*/
/// Generates the profiling table
pub mod profile_table;
/// Generates the JSON run summary
pub mod run_summary;
