#[tokio::main]
async fn main() {
    if sm_api::run().await.is_err() {
        std::process::exit(1);
    }
}
