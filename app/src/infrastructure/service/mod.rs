mod parameter_file;

pub use self::parameter_file::{FileFormat, ParameterFileError, ParameterFiles};
