pub mod rewriter;
pub mod summarizer;

pub use self::rewriter::QueryRewriter;
pub use self::summarizer::Summarizer;
