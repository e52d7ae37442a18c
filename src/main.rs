use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use citizen_proposals::google::document_edit_url;
use citizen_proposals::io::write_text_file;
use citizen_proposals::llm::DEFAULT_MODEL;
use citizen_proposals::stages::{Stage0Config, execute_stage0};
use citizen_proposals::{
    DocsClient, InMemoryDocument, OpenAiClient, OpenAiConfig, PipelineConfig, ServiceAccountAuth,
    ServiceAccountKey, SheetsClient, SheetsConfig, SpreadsheetRef, run_pipeline,
};

#[derive(Parser)]
#[command(name = "citizen-proposals")]
#[command(author, version, about = "Turn citizen opinions into drafted policy proposals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group opinions into themes, draft a proposal per theme and append them to the document
    Run {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Destination Google Doc id
        #[arg(long, env = "CITIZEN_DOC_ID", required_unless_present = "dry_run")]
        document_id: Option<String>,

        /// Model used for grouping and drafting
        #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Per-request timeout for model calls in seconds (default: none)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Publish into a local in-memory document instead of the Google Doc
        #[arg(long)]
        dry_run: bool,

        /// With --dry-run, write the document text here instead of stdout
        #[arg(long, requires = "dry_run")]
        output: Option<PathBuf>,

        /// Write a JSON run summary to this file
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load and print the opinions without calling the model
    Opinions {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// Service account key file
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE", default_value = "citizen-input-89e393467ee6.json")]
    credentials: PathBuf,

    /// Spreadsheet file name, looked up through Drive
    #[arg(long, env = "CITIZEN_SHEET_NAME", default_value = "Opinions Spreadsheet")]
    sheet_name: String,

    /// Spreadsheet id; skips the lookup by name
    #[arg(long, env = "CITIZEN_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Numeric worksheet id (gid)
    #[arg(long, env = "CITIZEN_WORKSHEET_ID", default_value = "558979275")]
    worksheet_id: u64,

    /// Column holding the opinion text
    #[arg(long, default_value = "Opinion")]
    column: String,
}

impl SheetArgs {
    fn sheets_config(&self) -> SheetsConfig {
        let spreadsheet = match &self.spreadsheet_id {
            Some(id) => SpreadsheetRef::Id(id.clone()),
            None => SpreadsheetRef::Name(self.sheet_name.clone()),
        };
        SheetsConfig {
            spreadsheet,
            worksheet_id: self.worksheet_id,
        }
    }

    fn load_config(&self) -> Stage0Config {
        Stage0Config {
            column: self.column.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sheet,
            document_id,
            model,
            timeout_secs,
            dry_run,
            output,
            summary,
            verbose,
        } => {
            setup_logging(verbose);
            run(
                sheet,
                document_id,
                model,
                timeout_secs,
                dry_run,
                output,
                summary,
            )
            .await
        }
        Commands::Opinions { sheet, verbose } => {
            setup_logging(verbose);
            print_opinions(sheet).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn google_auth(sheet: &SheetArgs, client: &reqwest::Client) -> Result<Arc<ServiceAccountAuth>> {
    let key = ServiceAccountKey::from_file(&sheet.credentials)
        .context("Failed to load Google service account credentials")?;
    Ok(Arc::new(ServiceAccountAuth::new(client.clone(), key)))
}

async fn run(
    sheet: SheetArgs,
    document_id: Option<String>,
    model: String,
    timeout_secs: Option<u64>,
    dry_run: bool,
    output: Option<PathBuf>,
    summary: Option<PathBuf>,
) -> Result<()> {
    let http = reqwest::Client::new();
    let auth = google_auth(&sheet, &http)?;
    let source = SheetsClient::new(http.clone(), auth.clone(), sheet.sheets_config());

    let mut openai_config = OpenAiConfig::from_env()?;
    openai_config.model = model;
    openai_config.timeout = timeout_secs.map(Duration::from_secs);
    let generator = OpenAiClient::new(openai_config)?;
    info!("Using model {}", generator.model());

    let config = PipelineConfig {
        load: sheet.load_config(),
        ..Default::default()
    };

    let run_summary = if dry_run {
        info!("Dry run: publishing into a local document");
        let document = InMemoryDocument::new();
        let run_summary = run_pipeline(&source, &generator, &document, &config).await?;

        match &output {
            Some(path) => {
                write_text_file(path, &document.content())?;
                info!("Document text written to {:?}", path);
            }
            None => print!("{}", document.content()),
        }
        run_summary
    } else {
        let document_id = document_id.context("--document-id is required")?;
        let document = DocsClient::new(http, auth, document_id);
        let run_summary = run_pipeline(&source, &generator, &document, &config).await?;

        let url = document_edit_url(document.document_id());
        info!("Appended to existing document: {}", url);
        println!("{}", url);
        run_summary
    };

    if let Some(path) = summary {
        run_summary.write_json(&path)?;
        info!("Run summary written to {:?}", path);
    }

    Ok(())
}

async fn print_opinions(sheet: SheetArgs) -> Result<()> {
    let http = reqwest::Client::new();
    let auth = google_auth(&sheet, &http)?;
    let source = SheetsClient::new(http, auth, sheet.sheets_config());

    let loaded = execute_stage0(&source, &sheet.load_config()).await?;

    println!("Opinions ({} of {} rows)", loaded.opinions.len(), loaded.rows_read);
    println!("==================");
    for opinion in &loaded.opinions {
        println!("- {}", opinion.text);
    }

    Ok(())
}
