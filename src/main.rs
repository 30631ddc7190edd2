//! Demo driver: starts the admin system, pushes a few requests through the
//! router in each format and shuts down.

use admin_crud::lifecycle::{setup_tracing, AdminSystem};
use clap::Parser;
use crud_framework::{AdminConfig, FLASH_NOTICE_HEADER};
use http::{Method, Request};
use std::path::PathBuf;
use tracing::{info, warn, Instrument};

#[derive(Debug, Parser)]
#[command(name = "admin-crud", about = "Admin CRUD demo")]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, env = "ADMIN_CRUD_CONFIG")]
    config: Option<PathBuf>,

    /// Host header sent with every request; selects the site.
    #[arg(long, env = "ADMIN_CRUD_HOST", default_value = "localhost")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AdminConfig::load(path)?,
        None => AdminConfig::default(),
    };
    let prefix = config.route_prefix.trim_end_matches('/').to_string();
    let system = AdminSystem::new(&config)?;
    info!(resources = ?system.router.resources(), "Starting admin demo");

    let steps = [
        (Method::POST, "flanges", "flange[title]=Wide+flange&flange[key]=WF-1"),
        (Method::POST, "strange_rabbits", "strange_rabbit[name]=Harvey&strange_rabbit[ear_count]=3"),
        (Method::POST, "strange_rabbits", "strange_rabbit[name]=&strange_rabbit[ear_count]=2"),
        (Method::GET, "flanges.xml", ""),
        (Method::GET, "strange_rabbits/1.ext_json", ""),
        (Method::PUT, "flanges/1", "flange[title]=Narrow+flange"),
        (Method::GET, "flanges/1", ""),
        (Method::DELETE, "strange_rabbits/1.xml", ""),
        (Method::DELETE, "strange_rabbits/1.xml", ""),
    ];

    for (method, path, body) in steps {
        let uri = format!("{}/{}", prefix, path);
        let span = tracing::info_span!("demo", %method, %uri);
        async {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri.as_str())
                .header(http::header::HOST, args.host.as_str())
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string())?;
            let response = system.router.handle(request).await;
            let notice = response
                .headers()
                .get(FLASH_NOTICE_HEADER)
                .and_then(|value| value.to_str().ok());
            if response.status().is_client_error() || response.status().is_server_error() {
                warn!(status = response.status().as_u16(), body = %response.body(), "Request failed");
            } else {
                info!(status = response.status().as_u16(), notice, bytes = response.body().len(), "Request done");
            }
            Ok::<_, http::Error>(())
        }
        .instrument(span)
        .await?;
    }

    system.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
