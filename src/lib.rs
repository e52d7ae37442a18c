pub mod google;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod stages;
pub mod traits;

pub use google::{
    DocsClient, ServiceAccountAuth, ServiceAccountKey, SheetsClient, SheetsConfig, SpreadsheetRef,
};
pub use io::{InMemoryDocument, Insertion, RunSummary};
pub use llm::{OpenAiClient, OpenAiConfig};
pub use models::{Opinion, Proposal, Record, ThemeBlock};
pub use pipeline::{PipelineConfig, run_pipeline};
pub use stages::{Stage0Config, Stage3Config};
pub use traits::{DocumentSink, RecordSource, TextGenerator};
