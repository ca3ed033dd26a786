use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use document_client::{
    connect, load_settings, normalize_server_url, ClientSettings, DocumentDispatcher,
    OperationKind, OrderingPolicy, Rejection,
};
use shared::{
    domain::{DocumentFields, DocumentId},
    protocol::{CreateDocumentRequest, UpdateDocumentRequest},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Run one document operation and print the resulting client state")]
struct Args {
    /// Overrides `server_url` from docsync.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    /// Ignore responses from superseded requests of the same kind.
    #[arg(long)]
    latest_wins: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        keyword: String,
    },
    Get {
        id: String,
    },
    Create {
        /// JSON object with the document fields.
        #[arg(long)]
        json: String,
    },
    Update {
        id: String,
        #[arg(long)]
        json: String,
    },
    Remove {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(load_settings(), &args)?;
    info!(server_url = %settings.server_url, ordering = ?settings.ordering, "starting docsync");
    let dispatcher = connect(&settings).context("failed to build document transport")?;

    let outcome = run(&dispatcher, args.command).await;

    let state = dispatcher.store().snapshot();
    println!("{}", serde_json::to_string_pretty(&state)?);

    outcome.map_err(|rejection| anyhow!(rejection))
}

fn resolve_settings(mut settings: ClientSettings, args: &Args) -> Result<ClientSettings> {
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    if let Some(token) = &args.token {
        settings.auth_token = Some(token.clone());
    }
    if args.latest_wins {
        settings.ordering = OrderingPolicy::LatestRequestWins;
    }
    settings.server_url = normalize_server_url(&settings.server_url)?;
    Ok(settings)
}

async fn run(dispatcher: &DocumentDispatcher, command: Command) -> Result<(), Rejection> {
    match command {
        Command::List { page, keyword } => {
            dispatcher.list(page, &keyword).await?;
        }
        Command::Get { id } => {
            dispatcher.get_by_id(DocumentId::new(id)).await?;
        }
        Command::Create { json } => {
            let fields = parse_fields(&json, OperationKind::Create, dispatcher)?;
            dispatcher
                .create(CreateDocumentRequest::new(fields))
                .await?;
        }
        Command::Update { id, json } => {
            let fields = parse_fields(&json, OperationKind::Update, dispatcher)?;
            dispatcher
                .update(UpdateDocumentRequest::new(id, fields))
                .await?;
        }
        Command::Remove { id } => {
            dispatcher.remove(DocumentId::new(id)).await?;
        }
    }
    Ok(())
}

/// Invalid input never reaches the server; it is surfaced through the store's
/// error field like any other failure.
fn parse_fields(
    raw: &str,
    kind: OperationKind,
    dispatcher: &DocumentDispatcher,
) -> Result<DocumentFields, Rejection> {
    serde_json::from_str::<DocumentFields>(raw).map_err(|err| {
        let message = format!("--json must be a JSON object: {err}");
        dispatcher.store().set_error(message.clone());
        Rejection::new(kind, message)
    })
}
