#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ai_detector_lib::run().await
}
