use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use invoicer_client::{InvoiceClient, InvoiceListView, DEFAULT_API_URL};
use invoicer_core::InvoiceId;
use invoicer_observability::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "invoicer")]
#[command(about = "Browse and manage invoices served by the invoice API")]
#[command(version)]
struct Cli {
    /// Base URL of the invoices resource
    #[arg(long, global = true, env = "INVOICER_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List invoices, optionally only those whose number contains TEXT
    List {
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
    /// Show one invoice as JSON
    Show { id: InvoiceId },
    /// Delete one invoice and print the remaining list
    Delete { id: InvoiceId },
    /// Download the PDF rendering of an invoice
    Pdf {
        id: InvoiceId,
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    invoicer_observability::init(LogFormat::Pretty);

    let client = InvoiceClient::new(&cli.api_url);

    match cli.command {
        Command::List { filter } => {
            let mut view = InvoiceListView::new(client);
            view.load().await;
            if let Some(filter) = filter {
                view.set_filter(filter);
            }
            print_list(&view)?;
        }
        Command::Show { id } => {
            let invoice = client.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&invoice)?);
        }
        Command::Delete { id } => {
            let mut view = InvoiceListView::new(client);
            view.delete(id).await;
            print_list(&view)?;
        }
        Command::Pdf { id, output } => {
            let bytes = client.pdf(id).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("{} ({} bytes)", output.display(), bytes.len());
        }
    }

    Ok(())
}

fn print_list(view: &InvoiceListView) -> anyhow::Result<()> {
    if let Some(message) = view.error_message() {
        anyhow::bail!("{message}");
    }
    for invoice in view.visible() {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            invoice.id.map(|id| id.to_string()).unwrap_or_default(),
            invoice.number,
            invoice.issued_date,
            invoice.due_date,
            invoice.buyer.name,
            invoice
                .gross_total()
                .map(|total| total.to_string())
                .unwrap_or_else(|| "overflow".to_string()),
        );
    }
    Ok(())
}
