/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Qualifier string used for application identification
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
pub const ORGANIZATION: &str = "Rustify Contributors";

/// Application name used for identification
///
/// Used for the platform configuration directory and the log file location.
pub const APPLICATION: &str = "rustify";

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "rustify.yaml";

/// Default directory scanned for source files
pub const DEFAULT_INPUT_ROOT: &str = "./source";

/// Appended to the input root's name to derive the default output root
pub const DEFAULT_OUTPUT_ROOT_MARKER: &str = "-rustified";

/// Extension of files that are sent to the assistant
pub const DEFAULT_ELIGIBLE_EXTENSION: &str = ".py";

/// Replaces the eligible extension in output file names
pub const DEFAULT_OUTPUT_EXTENSION_SUFFIX: &str = "_rustified.rs";

/// Default number of files processed at the same time
pub const DEFAULT_JOBS: usize = 1;

/// Default log file name
pub const LOG_FILE_DEFAULT: &str = "rustify.log";

/// OpenAI-compatible chat completions endpoint used by default (Groq)
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model requested from the endpoint
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Seconds before a single assistant request is abandoned
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Base delay for the exponential retry backoff
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// System prompt sent with every request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert in analyzing and converting Python code into Rust. \
Your goal is to ensure compatibility and functionality without breaking interoperation \
with the rest of the repository. Provide detailed feedback on the compatibility of the code \
for conversion, including potential risks and limitations. \
For each Python file provided, attempt to rewrite it in Rust while maintaining its original behavior. \
At the top of the Rust file, include a comment indicating whether the conversion is viable, \
along with the reasoning behind the assessment. \
If only parts of the file can be converted, specify the portions and their Rust equivalents. \
Ensure compatibility with the rest of the project, highlight potential challenges, and provide \
in-line comments for clarity and maintainability.";

/// Text placed before the file contents in the user message
pub const DEFAULT_PROMPT_PREAMBLE: &str = "Analyze the following Python file and determine if it can be converted to Rust \
without breaking interoperation with the rest of the repository. Provide detailed \
feedback on compatibility and rewrite it in Rust if possible. Highlight any \
limitations or challenges, and include comments for clarity and maintainability.";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read from a specific config file";

/// Help text for the input command-line option
pub const INPUT_HELP: &str = "Directory containing the source files to convert";

/// Help text for the output command-line option
pub const OUTPUT_HELP: &str = "Directory receiving the converted files";

/// Help text for the extension command-line option
pub const EXTENSION_HELP: &str = "Extension of the files to convert (e.g. .py)";

/// Help text for the suffix command-line option
pub const SUFFIX_HELP: &str = "Replacement for the extension in output file names (e.g. _rustified.rs)";

/// Help text for the jobs command-line option
pub const JOBS_HELP: &str = "Number of files converted at the same time";

/// Help text for the dry-run command-line option
pub const DRY_RUN_HELP: &str = "List the planned conversions without contacting the assistant";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Write logs to a file (rustify.log when no name is given)";

/// Help text for the local logging command-line option
pub const LOCAL_LOGGING_HELP: &str = "Write the log file to the current directory instead of the config directory";
