// Zendesk apps example: Rust
// Shows: upload, create, job polling, installation listing.
// Run: cargo run --example apps_client -- path/to/app.zip
// Reads ZENDESK_* variables from the environment or a .env file.

use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zendesk_api::{AppJob, AppUpload, ClientConfig, HttpClient, JobStatus, Params};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zendesk_api=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let package = std::env::args().nth(1).ok_or("usage: apps_client <app.zip>")?;
    let config = ClientConfig::from_env()?;
    let mut client = HttpClient::new(&config)?;

    // 1. Upload the package
    println!("=== Upload ===");
    let upload: AppUpload = client
        .apps()
        .upload(Params::new().with_file("file", &package))?
        .decode()?;
    println!("Upload id: {}", upload.id);

    // 2. Create the app from it
    println!("\n=== Create ===");
    let job: AppJob = client
        .apps()
        .create(
            Params::new()
                .with("name", "Example App")
                .with("short_description", "Uploaded from Rust")
                .with("upload_id", upload.id),
        )?
        .decode()?;
    println!("Job: {}", job.job_id);

    // 3. Poll the build job
    println!("\n=== Job status ===");
    let status = loop {
        let status: JobStatus = client
            .apps()
            .job_status(Params::new().with("id", job.job_id.as_str()))?
            .decode()?;
        if status.is_finished() {
            break status;
        }
        println!("{} ({:?}/{:?})", status.status, status.progress, status.total);
        thread::sleep(Duration::from_secs(2));
    };
    match (status.is_success(), status.app_id) {
        (true, Some(app_id)) => println!("App {app_id} ready"),
        _ => println!("Build ended: {} {:?}", status.status, status.message),
    }

    // 4. Installations
    println!("\n=== Installations ===");
    let listing = client.apps().installations(None).find_all(Params::new());
    match listing {
        Ok(list) => println!("{}", list.into_value()),
        Err(e) => println!(
            "Listing failed: {e} (last status {:?})",
            client.debug().last_response_code
        ),
    }

    Ok(())
}
