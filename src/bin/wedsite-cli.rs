use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "wedsite-cli")]
#[command(about = "Management CLI for the wedding-site service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "WEDSITE_APP_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Status,
    /// List available templates
    Templates,
    /// List all sites
    Sites,
    /// Show one site
    Site { id: String },
    /// Create a site
    Create {
        #[arg(long, default_value = "classic-elegance")]
        template: String,
        #[arg(long)]
        bride: String,
        #[arg(long)]
        groom: String,
        /// Wedding date, e.g. 2030-08-15
        #[arg(long)]
        date: String,
        #[arg(long)]
        subdomain: Option<String>,
    },
    /// Publish a site
    Publish { id: String },
    /// Take a site offline
    Unpublish { id: String },
    /// List RSVPs for a site
    Rsvps { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/health", base)).send().await?,
        Commands::Templates => client.get(format!("{}/api/templates", base)).send().await?,
        Commands::Sites => client.get(format!("{}/api/websites", base)).send().await?,
        Commands::Site { id } => {
            client
                .get(format!("{}/api/websites/{}", base, id))
                .send()
                .await?
        }
        Commands::Create {
            template,
            bride,
            groom,
            date,
            subdomain,
        } => {
            let mut body = json!({
                "templateId": template,
                "brideName": bride,
                "groomName": groom,
                "weddingDate": date,
            });
            if let Some(subdomain) = subdomain {
                body["subdomain"] = Value::String(subdomain);
            }
            client
                .post(format!("{}/api/websites", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Publish { id } => {
            client
                .post(format!("{}/api/websites/{}/publish", base, id))
                .send()
                .await?
        }
        Commands::Unpublish { id } => {
            client
                .post(format!("{}/api/websites/{}/unpublish", base, id))
                .send()
                .await?
        }
        Commands::Rsvps { id } => {
            client
                .get(format!("{}/api/websites/{}/rsvps", base, id))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or(text);

    if status.is_success() {
        println!("{}", pretty);
    } else {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", pretty);
        std::process::exit(1);
    }
    Ok(())
}
