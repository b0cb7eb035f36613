use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unrecognised file type: {filename} (extension '{extension}'; supported: {supported})")]
    UnsupportedFormat {
        filename: String,
        extension: String,
        supported: String,
    },

    #[error("Failed to decode {format} input: {message}")]
    Decode { format: String, message: String },

    #[error("Failed to encode {format} output: {message}")]
    Encode { format: String, message: String },

    #[error("The {format} format is recognised but not implemented")]
    NotImplemented { format: String },

    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Extension or format the registry cannot serve.
    Format,
    /// Input or record content the codec rejected.
    Data,
    Io,
    Config,
}

impl ConvertError {
    pub fn decode(format: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            format: format.to_string(),
            message: message.into(),
        }
    }

    pub fn encode(format: &str, message: impl Into<String>) -> Self {
        Self::Encode {
            format: format.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedFormat { .. } | Self::NotImplemented { .. } => ErrorCategory::Format,
            Self::Decode { .. } | Self::Encode { .. } => ErrorCategory::Data,
            Self::Io { .. } => ErrorCategory::Io,
            Self::InvalidArgument { .. } => ErrorCategory::Config,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => {
                "Use one of the supported extensions (see --list-formats)"
            }
            Self::NotImplemented { .. } => "Convert to or from a format that is implemented",
            Self::Decode { .. } => "Check that the input file content matches its extension",
            Self::Encode { .. } => {
                "The data cannot be represented in the output format; pick another output format"
            }
            Self::Io { .. } => "Check that the path exists and is readable/writable",
            Self::InvalidArgument { .. } => "Fix the command line arguments and retry",
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Data => 1,
            ErrorCategory::Format | ErrorCategory::Config => 2,
            ErrorCategory::Io => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
