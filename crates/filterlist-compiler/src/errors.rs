use filterlist_syntax::SyntaxError;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::patch::PatchError;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid directives: {source}: '{directive}'")]
    InvalidDirective {
        directive: String,
        source: SyntaxError,
    },

    #[error("Invalid directives: Found unexpected condition else branch: {0}")]
    UnexpectedElse(String),

    #[error("Invalid directives: Found unexpected condition end: {0}")]
    UnexpectedEndIf(String),

    #[error("Invalid directives: Condition end not found: {0}")]
    MissingEndIf(String),

    #[error("Invalid directives: Found invalid !#else: {else_line} in block {if_line}")]
    InvalidElse { else_line: String, if_line: String },

    #[error("Include url is rejected with origin: {0}")]
    RejectedOrigin(String),

    #[error("Invalid url: '{0}'")]
    InvalidUrl(String),

    #[error("{}", render_include_failure(directive, context, location, source))]
    IncludeResolutionFailed {
        directive: String,
        /// Up to three lines preceding the directive
        context: Vec<String>,
        location: Option<String>,
        source: Box<CompileError>,
    },

    #[error("Include cycle detected: {}", chain.join(" -> "))]
    IncludeCycle { chain: Vec<String> },

    #[error("Include depth limit of {limit} exceeded: {location}")]
    IncludeDepthExceeded { limit: usize, location: String },

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Response is empty")]
    EmptyResponse,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

pub type CompileResult<T> = Result<T, CompileError>;

impl CompileError {
    /// The error an include failure was caused by, looking through the wrapper.
    pub fn root(&self) -> &CompileError {
        match self {
            CompileError::IncludeResolutionFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

fn render_include_failure(
    directive: &str,
    context: &[String],
    location: &Option<String>,
    source: &CompileError,
) -> String {
    let mut details = vec![format!(
        "Failed to resolve the include directive '{directive}'"
    )];

    if let Some(location) = location {
        details.push(format!("URL: '{location}'"));
    }

    if !context.is_empty() {
        details.push("Context:".to_string());
        details.push(filterlist_util::lines::indent_block(context));
        details.push(format!("\t{directive}"));
    }

    details.push(format!("\t{source}"));

    let mut ret = details.join("\n");
    ret.push('\n');
    ret
}
