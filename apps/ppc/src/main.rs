//! # PPC - Curricular Component Registry
//!
//! The main binary for the PPC conformity checker.
//!
//! This application provides:
//! - CLI interface for the working set
//! - HTTP REST API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 apps/ppc (THE BINARY)                │
//! │                                                      │
//! │   ┌─────────────┐             ┌─────────────┐        │
//! │   │    CLI      │             │  HTTP API   │        │
//! │   │   (clap)    │             │   (axum)    │        │
//! │   └──────┬──────┘             └──────┬──────┘        │
//! │          └──────────────┬────────────┘               │
//! │                         ▼                            │
//! │                 ┌───────────────┐                    │
//! │                 │   ppc-core    │                    │
//! │                 │  (THE LOGIC)  │                    │
//! │                 └───────────────┘                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! ppc init
//! ppc add --file didatica.json
//! ppc validate
//! ppc export --output matriz.csv
//! ppc serve --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use ppc::cli::{self, Outcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // PPC_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PPC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ppc=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    match cli::execute(cli).await {
        Ok(Outcome::Done) => {}
        Ok(Outcome::NonConformant) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the PPC startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ██████╗  ██████╗
  ██╔══██╗██╔══██╗██╔════╝
  ██████╔╝██████╔╝██║
  ██╔═══╝ ██╔═══╝ ██║
  ██║     ██║     ╚██████╗
  ╚═╝     ╚═╝      ╚═════╝

  Projeto Pedagógico de Curso v{}

  Res. CNE/CP nº 4/2024
"#,
        env!("CARGO_PKG_VERSION")
    );
}
