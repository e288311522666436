#[tokio::main]
async fn main() {
    if let Err(e) = hn_ratings_be::start_server().await {
        eprintln!("Server failed: {e}");
        std::process::exit(1);
    }
}
