mod driver;
mod inputs;
mod output;
mod types;

pub use driver::{convert_unit, read_source, run_batch};
pub use inputs::{is_glob, resolve_inputs, ResolvedInput};
pub use output::{output_path, write_output};
pub use types::{
    BatchConfig, BatchReport, ConversionResult, FileReport, FileStatus, OutputLayout, SourceUnit,
    DEFAULT_RUNTIME_MODULE, OUTPUT_EXTENSION,
};
