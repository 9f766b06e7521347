#[tokio::main]
async fn main() {
    if let Err(err) = sd_api::run().await {
        eprintln!("sd-api failed: {err}");
        std::process::exit(1);
    }
}
