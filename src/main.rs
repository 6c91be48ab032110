#[tokio::main]
async fn main() {
    if let Err(e) = reachezy::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
